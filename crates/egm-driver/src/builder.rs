//! Builder 模式实现
//!
//! 提供链式构造 `EgmServer` 的便捷方式。

use crate::config::ExchangeConfig;
use crate::error::DriverError;
use crate::hooks::FeedbackObserver;
use crate::server::EgmServer;
use crate::state::AwaitingCommand;
use crate::transport::UdpTransport;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{error, info};

/// EGM 会话 Builder
///
/// # Example
///
/// ```no_run
/// use egm_driver::EgmBuilder;
/// use std::time::Duration;
///
/// // 默认配置：0.0.0.0:6510
/// let server = EgmBuilder::new().build().unwrap();
///
/// // 自定义端口与接收超时
/// let server = EgmBuilder::new()
///     .port(6511)
///     .receive_timeout(Some(Duration::from_millis(50)))
///     .build()
///     .unwrap();
/// ```
pub struct EgmBuilder {
    config: ExchangeConfig,
    observer: Option<Box<dyn FeedbackObserver>>,
}

impl EgmBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::default(),
            observer: None,
        }
    }

    /// 整体替换配置
    pub fn config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置绑定地址
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// 只修改端口（保留绑定 IP）
    pub fn port(mut self, port: u16) -> Self {
        self.config.bind_addr.set_port(port);
        self
    }

    /// 设置接收超时；`None` 表示无限阻塞
    pub fn receive_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.receive_timeout = timeout;
        self
    }

    /// 设置观察者
    pub fn observer(mut self, observer: impl FeedbackObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// 创建并绑定 UDP 套接字
    ///
    /// # Errors
    /// - `DriverError::SocketSetup`: 套接字创建、绑定或超时设置失败（致命）
    pub fn build(self) -> Result<EgmServer<AwaitingCommand>, DriverError> {
        let addr = self.config.bind_addr;
        let transport = UdpTransport::bind(addr).map_err(|source| {
            error!("Failed to bind EGM socket on {}: {}", addr, source);
            DriverError::SocketSetup { addr, source }
        })?;
        info!("EGM socket bound on {}", addr);

        let mut server = EgmServer::with_transport(transport, self.config)?;
        if let Some(observer) = self.observer {
            server.set_boxed_observer(observer);
        }
        Ok(server)
    }
}

impl Default for EgmBuilder {
    fn default() -> Self {
        Self::new()
    }
}
