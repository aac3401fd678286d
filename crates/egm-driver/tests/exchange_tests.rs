//! 交换循环测试
//!
//! 使用脚本化传输驱动 `EgmServer`，验证序列号节奏、回复目标和错误恢复。

mod common;

use common::{Inbound, MockTransport, feedback, padded_feedback, robot_addr};
use egm_driver::*;
use egm_protocol::*;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

fn listening(transport: MockTransport, pose: Pose) -> EgmServer<Listening, MockTransport> {
    let server = EgmServer::with_transport(transport, ExchangeConfig::default())
        .unwrap()
        .with_command(pose);
    assert_eq!(server.config(), &ExchangeConfig::default());
    server
}

fn sent_seqnos(mock: &MockTransport) -> Vec<u32> {
    mock.sent()
        .iter()
        .map(|(bytes, _)| {
            decode_sensor(bytes)
                .unwrap()
                .header
                .and_then(|h| h.seqno)
                .unwrap()
        })
        .collect()
}

/// 关节模式：回复携带原样的 6 个关节值，序列号等于调用前的计数值
#[test]
fn test_joint_command_echoed_exactly() {
    let mock = MockTransport::new();
    let handle = mock.handle();
    let joints = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
    let mut server = listening(mock, Pose::Joint(JointPose::new(joints)));
    assert_eq!(server.state(), LoopState::Listening);

    handle.queue_datagram(feedback(5, 1000, [0.0; 6]), robot_addr());
    let expected_seqno = server.next_seqno();
    let outcome = server.poll_once().unwrap();

    let sent = handle.sent();
    assert_eq!(sent.len(), 1);
    let (bytes, peer) = &sent[0];
    assert_eq!(*peer, robot_addr());
    assert_eq!(
        outcome,
        CycleOutcome::Replied {
            peer: robot_addr(),
            seqno: expected_seqno,
            bytes: bytes.len(),
        }
    );

    let sensor = decode_sensor(bytes).unwrap();
    assert_eq!(sensor.planned_joints(), Some(&joints[..]));
    let header = sensor.header.as_ref().and_then(EgmHeader::complete).unwrap();
    assert_eq!(header.seqno, expected_seqno);
    assert_eq!(header.message_type(), Some(MessageType::Correction));
}

/// 笛卡尔模式：三个欧拉角分别写入各自字段
#[test]
fn test_cartesian_command_distinct_euler() {
    let mock = MockTransport::new();
    let handle = mock.handle();
    let pose = CartesianPose::new([600.0, 0.0, 800.0], [180.0, 0.0, 90.0]);
    let mut server = listening(mock, Pose::Cartesian(pose));

    handle.queue_datagram(feedback(0, 0, [0.0; 6]), robot_addr());
    server.poll_once().unwrap();

    let sent = handle.sent();
    let sensor = decode_sensor(&sent[0].0).unwrap();
    assert!(sensor.planned_joints().is_none());
    let cart = sensor.planned_cartesian().unwrap();
    let euler = cart.euler.as_ref().unwrap();
    assert_eq!(euler.x, 180.0_f64.to_radians());
    assert_eq!(euler.y, 0.0);
    assert_eq!(euler.z, 90.0_f64.to_radians());
    let pos = cart.pos.as_ref().unwrap();
    assert_eq!([pos.x, pos.y, pos.z], [600.0, 0.0, 800.0]);
}

/// 接收失败、超时、解析失败都不消耗序列号
#[test]
fn test_sequence_has_no_gaps_across_failures() {
    let mock = MockTransport::new();
    let handle = mock.handle();
    let mut server = listening(mock, Pose::Joint(JointPose::new([0.0; 6])));

    handle.queue_datagram(feedback(1, 1, [0.0; 6]), robot_addr());
    handle.queue(Inbound::Error(io::ErrorKind::ConnectionReset));
    handle.queue_datagram(feedback(2, 2, [0.0; 6]), robot_addr());
    handle.queue(Inbound::Timeout);
    handle.queue_datagram(vec![0x0A, 0x7F, 0x01], robot_addr());
    handle.queue_datagram(feedback(3, 3, [0.0; 6]), robot_addr());

    let results: Vec<_> = (0..6).map(|_| server.poll_once()).collect();
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(DriverError::Receive(_))));
    assert!(results[2].is_ok());
    assert!(matches!(results[3], Ok(CycleOutcome::Idle)));
    assert!(matches!(results[4], Err(DriverError::Protocol(_))));
    assert!(results[5].is_ok());

    assert_eq!(sent_seqnos(&handle), vec![0, 1, 2]);
    assert_eq!(server.next_seqno(), 3);

    let snapshot = server.metrics().snapshot();
    assert_eq!(snapshot.datagrams_received, 4);
    assert_eq!(snapshot.replies_sent, 3);
    assert_eq!(snapshot.rx_errors, 1);
    assert_eq!(snapshot.rx_timeouts, 1);
    assert_eq!(snapshot.decode_errors, 1);
}

/// 回复始终发往本次数据报的来源地址
#[test]
fn test_reply_goes_to_last_sender() {
    let mock = MockTransport::new();
    let handle = mock.handle();
    let mut server = listening(mock, Pose::Joint(JointPose::new([0.0; 6])));
    let other: SocketAddr = "10.0.0.7:40000".parse().unwrap();

    handle.queue_datagram(feedback(1, 1, [0.0; 6]), robot_addr());
    handle.queue_datagram(feedback(1, 1, [0.0; 6]), other);
    server.poll_once().unwrap();
    assert_eq!(server.last_peer(), Some(robot_addr()));
    server.poll_once().unwrap();
    assert_eq!(server.last_peer(), Some(other));

    let peers: Vec<SocketAddr> = handle.sent().iter().map(|(_, p)| *p).collect();
    assert_eq!(peers, vec![robot_addr(), other]);
}

/// 发送失败不终止循环，下一周期继续
#[test]
fn test_send_failure_is_recoverable() {
    let mock = MockTransport::new();
    let handle = mock.handle();
    let mut server = listening(mock, Pose::Joint(JointPose::new([0.0; 6])));

    handle.fail_next_sends(1);
    handle.queue_datagram(feedback(1, 1, [0.0; 6]), robot_addr());
    handle.queue_datagram(feedback(2, 2, [0.0; 6]), robot_addr());

    let err = server.poll_once().unwrap_err();
    assert!(!err.is_fatal());
    assert!(matches!(err, DriverError::Send { peer, .. } if peer == robot_addr()));

    assert!(server.poll_once().is_ok());
    // 已编码的报文消耗了序列号 0
    assert_eq!(sent_seqnos(&handle), vec![1]);
    assert_eq!(server.metrics().snapshot().tx_errors, 1);
}

/// 观察者收到解析成功、解析失败和发送成功通知
#[test]
fn test_observer_notifications() {
    #[derive(Default)]
    struct Recorded {
        feedback_seqnos: Vec<u32>,
        invalid: usize,
        sent: usize,
    }

    struct Recorder(Arc<Mutex<Recorded>>);

    impl FeedbackObserver for Recorder {
        fn on_feedback(&mut self, _peer: SocketAddr, message: &EgmRobot) {
            let seqno = message.header_fields().map(|h| h.seqno).unwrap_or(u32::MAX);
            self.0.lock().unwrap().feedback_seqnos.push(seqno);
        }

        fn on_invalid(&mut self, _peer: SocketAddr, _error: &ProtocolError) {
            self.0.lock().unwrap().invalid += 1;
        }

        fn on_command_sent(&mut self, _peer: SocketAddr, _message: &EgmSensor) {
            self.0.lock().unwrap().sent += 1;
        }
    }

    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let mock = MockTransport::new();
    let handle = mock.handle();
    let mut server = EgmServer::with_transport(mock, ExchangeConfig::default())
        .unwrap()
        .with_observer(Recorder(recorded.clone()))
        .with_command(Pose::Joint(JointPose::new([0.0; 6])));

    handle.queue_datagram(feedback(42, 7, [0.0; 6]), robot_addr());
    handle.queue_datagram(vec![0xFF, 0xFF], robot_addr());
    handle.queue_datagram(feedback(43, 8, [0.0; 6]), robot_addr());
    for _ in 0..3 {
        let _ = server.poll_once();
    }

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.feedback_seqnos, vec![42, 43]);
    assert_eq!(recorded.invalid, 1);
    assert_eq!(recorded.sent, 2);
}

/// 闭包可以直接作为观察者
#[test]
fn test_closure_observer() {
    let count = Arc::new(Mutex::new(0usize));
    let counter = count.clone();
    let mock = MockTransport::new();
    let handle = mock.handle();
    let mut server = EgmServer::with_transport(mock, ExchangeConfig::default())
        .unwrap()
        .with_observer(move |_peer: SocketAddr, _msg: &EgmRobot| {
            *counter.lock().unwrap() += 1;
        })
        .with_command(Pose::Joint(JointPose::new([0.0; 6])));

    handle.queue_datagram(feedback(1, 1, [0.0; 6]), robot_addr());
    server.poll_once().unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
}

/// run() 在取消信号触发后返回指标快照
#[test]
fn test_run_stops_on_shutdown() {
    let shutdown = ShutdownSignal::new();
    let mut mock = MockTransport::new();
    mock.shutdown_when_drained = Some(shutdown.clone());
    let handle = mock.handle();

    for i in 0..10 {
        handle.queue_datagram(feedback(i, i * 4, [0.0; 6]), robot_addr());
    }
    handle.queue(Inbound::Error(io::ErrorKind::ConnectionReset));

    let server = listening(mock, Pose::Joint(JointPose::new([0.0; 6])));
    let snapshot = server.run(&shutdown);

    assert!(shutdown.is_triggered());
    assert_eq!(snapshot.datagrams_received, 10);
    assert_eq!(snapshot.replies_sent, 10);
    assert_eq!(snapshot.rx_errors, 1);
    assert_eq!(sent_seqnos(&handle), (0..10).collect::<Vec<u32>>());
}

/// 已触发的取消信号：不进入接收
#[test]
fn test_run_with_pre_triggered_shutdown() {
    let shutdown = ShutdownSignal::new();
    shutdown.trigger();

    let mock = MockTransport::new();
    let handle = mock.handle();
    handle.queue_datagram(feedback(1, 1, [0.0; 6]), robot_addr());

    let snapshot = listening(mock, Pose::Joint(JointPose::new([0.0; 6]))).run(&shutdown);
    assert_eq!(snapshot, MetricsSnapshot::default());
    assert!(handle.sent().is_empty());
}

/// 超过 1400 字节的数据报按解析失败处理：不回复、不消耗序列号
#[test]
fn test_oversized_datagram_rejected() {
    let mock = MockTransport::new();
    let handle = mock.handle();
    let mut server = listening(mock, Pose::Joint(JointPose::new([0.0; 6])));

    let oversized = padded_feedback(MAX_DATAGRAM_SIZE + 100);
    assert!(oversized.len() > MAX_DATAGRAM_SIZE);
    handle.queue_datagram(oversized, robot_addr());

    let err = server.poll_once().unwrap_err();
    assert!(matches!(
        err,
        DriverError::Protocol(ProtocolError::Oversized { max: MAX_DATAGRAM_SIZE, .. })
    ));
    assert!(handle.sent().is_empty());
    assert_eq!(server.next_seqno(), 0);
    assert_eq!(server.metrics().snapshot().decode_errors, 1);

    // 上限以内的填充报文正常回复
    let near_limit = padded_feedback(MAX_DATAGRAM_SIZE - 20);
    assert!(near_limit.len() <= MAX_DATAGRAM_SIZE);
    handle.queue_datagram(near_limit, robot_addr());
    assert!(matches!(
        server.poll_once(),
        Ok(CycleOutcome::Replied { seqno: 0, .. })
    ));
}
