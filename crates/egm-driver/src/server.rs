//! EGM 交换会话
//!
//! 单线程、同步 IO。每个周期：
//!
//! ```text
//! recv_from ──► decode_robot ──► observer ──► build_sensor_message ──► send_to(peer)
//!    │ 超时/错误       │ 解析失败
//!    └─ 跳过本周期     └─ 跳过回复（不消耗序列号）
//! ```
//!
//! 回复目标始终是本次数据报的来源地址（不做对端校验）。

use crate::error::DriverError;
use crate::hooks::{FeedbackObserver, NoopObserver};
use crate::metrics::{ExchangeMetrics, MetricsSnapshot};
use crate::sequence::{SequenceCounter, TickClock};
use crate::shutdown::ShutdownSignal;
use crate::state::{AwaitingCommand, Listening, LoopState, SessionState};
use crate::transport::{EgmTransport, TransportError, UdpTransport};
use crate::ExchangeConfig;
use egm_protocol::{
    EgmRobot, MAX_DATAGRAM_SIZE, Pose, build_sensor_message, decode_robot, write_sensor,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// 单个周期的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 接收超时，没有数据报
    Idle,
    /// 已回复一条修正报文
    Replied {
        peer: SocketAddr,
        seqno: u32,
        bytes: usize,
    },
}

/// EGM 交换会话
///
/// 通过 `EgmBuilder` 创建（绑定 UDP 套接字），或通过 `with_transport` 使用自定义传输。
///
/// # Example
///
/// ```no_run
/// use egm_driver::{EgmBuilder, ShutdownSignal};
/// use egm_protocol::{JointPose, Pose};
///
/// let server = EgmBuilder::new().port(6510).build()?;
/// let server = server.with_command(Pose::Joint(JointPose::new([0.0; 6])));
///
/// let shutdown = ShutdownSignal::new();
/// let metrics = server.run(&shutdown);
/// println!("{}", metrics);
/// # Ok::<(), egm_driver::DriverError>(())
/// ```
pub struct EgmServer<State, T = UdpTransport> {
    transport: T,
    config: ExchangeConfig,
    sequence: SequenceCounter,
    clock: TickClock,
    metrics: Arc<ExchangeMetrics>,
    observer: Box<dyn FeedbackObserver>,
    recv_buf: Vec<u8>,
    send_buf: Vec<u8>,
    last_peer: Option<SocketAddr>,
    state: State,
}

impl<T: EgmTransport> EgmServer<AwaitingCommand, T> {
    /// 使用已建立的传输创建会话，并应用接收超时
    ///
    /// # Errors
    /// - `DriverError::SocketSetup`: 设置接收超时失败
    pub fn with_transport(mut transport: T, config: ExchangeConfig) -> Result<Self, DriverError> {
        transport
            .set_receive_timeout(config.receive_timeout)
            .map_err(|source| DriverError::SocketSetup {
                addr: config.bind_addr,
                source,
            })?;

        Ok(Self {
            transport,
            config,
            sequence: SequenceCounter::new(),
            clock: TickClock::new(),
            metrics: Arc::new(ExchangeMetrics::new()),
            observer: Box::new(NoopObserver),
            // 多一个字节：超长数据报被截断后仍能被识别为 Oversized
            recv_buf: vec![0u8; MAX_DATAGRAM_SIZE + 1],
            send_buf: Vec::with_capacity(MAX_DATAGRAM_SIZE),
            last_peer: None,
            state: AwaitingCommand,
        })
    }

    /// 替换观察者
    pub fn with_observer(mut self, observer: impl FeedbackObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub(crate) fn set_boxed_observer(&mut self, observer: Box<dyn FeedbackObserver>) {
        self.observer = observer;
    }

    /// 固定命令位姿，进入监听状态
    pub fn with_command(self, pose: Pose) -> EgmServer<Listening, T> {
        info!(
            mode = if pose.is_joint() { "joint" } else { "cartesian" },
            "Command fixed, entering {}",
            LoopState::Listening
        );
        debug!(?pose, "Command pose");

        EgmServer {
            transport: self.transport,
            config: self.config,
            sequence: self.sequence,
            clock: self.clock,
            metrics: self.metrics,
            observer: self.observer,
            recv_buf: self.recv_buf,
            send_buf: self.send_buf,
            last_peer: self.last_peer,
            state: Listening { pose },
        }
    }
}

impl<S: SessionState, T: EgmTransport> EgmServer<S, T> {
    /// 当前循环状态
    pub fn state(&self) -> LoopState {
        S::STATE
    }

    /// 本地绑定地址
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// 共享指标（可跨线程读取）
    pub fn metrics(&self) -> Arc<ExchangeMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }
}

impl<T: EgmTransport> EgmServer<Listening, T> {
    /// 固定命令位姿
    pub fn pose(&self) -> &Pose {
        &self.state.pose
    }

    /// 下一条回复将使用的序列号
    pub fn next_seqno(&self) -> u32 {
        self.sequence.peek()
    }

    /// 最近一个数据报的来源地址
    pub fn last_peer(&self) -> Option<SocketAddr> {
        self.last_peer
    }

    /// 执行一个交换周期
    ///
    /// 返回的错误都是非致命的：调用方记录后继续下一周期即可。
    ///
    /// # Errors
    /// - `DriverError::Receive`: 接收失败，未消耗序列号
    /// - `DriverError::Protocol`: 入站报文无法解析，未回复、未消耗序列号
    /// - `DriverError::Send`: 发送失败，序列号已消耗
    pub fn poll_once(&mut self) -> Result<CycleOutcome, DriverError> {
        // 1. 接收
        let (len, peer) = match self.transport.recv_from(&mut self.recv_buf) {
            Ok(received) => received,
            Err(TransportError::Timeout) => {
                ExchangeMetrics::incr(&self.metrics.rx_timeouts);
                trace!("Receive timeout");
                return Ok(CycleOutcome::Idle);
            },
            Err(e) => {
                ExchangeMetrics::incr(&self.metrics.rx_errors);
                return Err(DriverError::Receive(e));
            },
        };
        ExchangeMetrics::incr(&self.metrics.datagrams_received);
        self.last_peer = Some(peer);

        // 2. 解析
        let robot = match decode_robot(&self.recv_buf[..len]) {
            Ok(robot) => robot,
            Err(e) => {
                ExchangeMetrics::incr(&self.metrics.decode_errors);
                self.observer.on_invalid(peer, &e);
                return Err(e.into());
            },
        };
        trace!(%peer, len, "Feedback received");
        log_extras(&robot);
        self.observer.on_feedback(peer, &robot);

        // 3. 构建回复
        let seqno = self.sequence.next_seqno();
        let message = build_sensor_message(&self.state.pose, seqno, self.clock.now_ms());
        let bytes = write_sensor(&message, &mut self.send_buf)?;

        // 4. 发送到本次来源地址
        match self.transport.send_to(&self.send_buf, peer) {
            Ok(_) => {
                ExchangeMetrics::incr(&self.metrics.replies_sent);
                trace!(%peer, seqno, bytes, "Correction sent");
                self.observer.on_command_sent(peer, &message);
                Ok(CycleOutcome::Replied { peer, seqno, bytes })
            },
            Err(source) => {
                ExchangeMetrics::incr(&self.metrics.tx_errors);
                Err(DriverError::Send { peer, source })
            },
        }
    }

    /// 运行交换循环直到取消信号触发
    ///
    /// 每个周期前后检查取消信号；接收超时保证空闲时也能及时退出。
    /// 返回时套接字已释放。
    pub fn run(mut self, shutdown: &ShutdownSignal) -> MetricsSnapshot {
        match self.transport.local_addr() {
            Ok(addr) => info!("Exchange loop listening on {}", addr),
            Err(_) => info!("Exchange loop listening"),
        }
        if self.config.receive_timeout.is_none() {
            warn!("No receive timeout configured, shutdown is only observed after a datagram");
        }

        while !shutdown.is_triggered() {
            if let Err(e) = self.poll_once() {
                warn!("Cycle skipped: {}", e);
            }
        }

        let snapshot = self.metrics.snapshot();
        info!("Entering {} ({})", LoopState::Shutdown, snapshot);
        snapshot
    }
}

/// 控制器附带的其它状态（仅调试输出）
fn log_extras(robot: &EgmRobot) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    debug!(
        motors = ?robot.motor_state.as_ref().map(|m| m.state()),
        mci = ?robot.mci_state.as_ref().map(|m| m.state()),
        rapid = ?robot.rapid_exec_state.as_ref().map(|r| r.state()),
        convergence = ?robot.mci_convergence_met,
        utilization = ?robot.utilization_rate,
        "Controller state"
    );
    if let Some(pose) = robot.feed_back.as_ref().and_then(|fb| fb.cartesian.as_ref())
        && let Some(pos) = pose.pos.as_ref()
    {
        debug!(x = pos.x, y = pos.y, z = pos.z, "Feedback position (mm)");
    }
}
