//! 驱动层错误类型定义

use crate::transport::TransportError;
use egm_protocol::ProtocolError;
use std::net::SocketAddr;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 套接字创建或绑定失败（致命）
    #[error("Socket setup failed on {addr}: {source}")]
    SocketSetup {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// 接收失败（本周期跳过）
    #[error("Receive failed: {0}")]
    Receive(#[source] TransportError),

    /// 入站报文解析失败（本周期不回复）
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 发送失败（本周期跳过）
    #[error("Send to {peer} failed: {source}")]
    Send {
        peer: SocketAddr,
        #[source]
        source: TransportError,
    },
}

impl DriverError {
    /// 是否为致命错误（进程应退出）
    ///
    /// 只有套接字建立失败是致命的，其余错误均只影响当前周期。
    pub fn is_fatal(&self) -> bool {
        matches!(self, DriverError::SocketSetup { .. })
    }
}
