//! 观察者钩子
//!
//! 交换循环在每个入站数据报解析后通知观察者（例如控制台显示），
//! 在回复发送成功后通知一次。回调在循环线程内同步执行，应尽快返回。

use egm_protocol::{EgmRobot, EgmSensor, ProtocolError};
use std::net::SocketAddr;

/// 反馈观察者 Trait
///
/// # 示例
///
/// ```rust
/// use egm_driver::FeedbackObserver;
/// use egm_protocol::EgmRobot;
/// use std::net::SocketAddr;
///
/// struct CountingObserver {
///     count: usize,
/// }
///
/// impl FeedbackObserver for CountingObserver {
///     fn on_feedback(&mut self, _peer: SocketAddr, _message: &EgmRobot) {
///         self.count += 1;
///     }
/// }
/// ```
pub trait FeedbackObserver: Send {
    /// 入站报文解析成功
    fn on_feedback(&mut self, peer: SocketAddr, message: &EgmRobot);

    /// 入站报文解析失败（本周期不回复）
    fn on_invalid(&mut self, peer: SocketAddr, error: &ProtocolError) {
        let _ = (peer, error);
    }

    /// 回复发送成功
    fn on_command_sent(&mut self, peer: SocketAddr, message: &EgmSensor) {
        let _ = (peer, message);
    }
}

impl<F> FeedbackObserver for F
where
    F: FnMut(SocketAddr, &EgmRobot) + Send,
{
    fn on_feedback(&mut self, peer: SocketAddr, message: &EgmRobot) {
        self(peer, message)
    }
}

/// 空观察者
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FeedbackObserver for NoopObserver {
    fn on_feedback(&mut self, _peer: SocketAddr, _message: &EgmRobot) {}
}
