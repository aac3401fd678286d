//! 交换循环配置

use egm_protocol::DEFAULT_PORT;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// 交换循环配置
///
/// # Example
///
/// ```
/// use egm_driver::ExchangeConfig;
/// use std::time::Duration;
///
/// // 默认：0.0.0.0:6510，100ms 接收超时
/// let config = ExchangeConfig::default();
/// assert_eq!(config.bind_addr.port(), 6510);
///
/// // 无限阻塞接收（无法在空闲时响应取消信号）
/// let config = ExchangeConfig {
///     receive_timeout: None,
///     ..ExchangeConfig::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// 本地绑定地址
    pub bind_addr: SocketAddr,
    /// 接收超时
    ///
    /// 超时后检查取消信号再继续等待；`None` 表示无限阻塞。
    pub receive_timeout: Option<Duration>,
}

impl ExchangeConfig {
    /// 默认接收超时
    pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_millis(100);
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            receive_timeout: Some(Self::DEFAULT_RECEIVE_TIMEOUT),
        }
    }
}
