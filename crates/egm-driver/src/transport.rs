//! 数据报传输抽象
//!
//! 交换循环只依赖 `EgmTransport` trait，生产环境使用 `UdpTransport`，
//! 测试中可以替换为脚本化的 mock。

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;
use thiserror::Error;

/// 传输层错误
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
    /// 接收超时（无数据，正常现象）
    #[error("Receive timeout")]
    Timeout,
}

impl TransportError {
    /// 将 IO 错误归类：超时单独识别
    ///
    /// Unix 上读超时表现为 `WouldBlock`，Windows 上为 `TimedOut`。
    pub fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => TransportError::Timeout,
            _ => TransportError::Io(err),
        }
    }
}

/// 数据报传输 trait
pub trait EgmTransport {
    /// 接收一个数据报，返回长度和来源地址
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, SocketAddr), TransportError>;

    /// 发送一个数据报到指定地址
    fn send_to(&mut self, buf: &[u8], peer: SocketAddr) -> Result<usize, TransportError>;

    /// 设置接收超时；`None` 表示无限阻塞
    fn set_receive_timeout(&mut self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }

    /// 本地绑定地址
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

/// UDP 传输（单个套接字，接收任意来源）
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// 创建并绑定套接字
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        Ok(Self { socket })
    }

    /// 使用已绑定的套接字
    pub fn from_socket(socket: UdpSocket) -> Self {
        Self { socket }
    }
}

impl EgmTransport for UdpTransport {
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, SocketAddr), TransportError> {
        self.socket.recv_from(buf).map_err(TransportError::from_io)
    }

    fn send_to(&mut self, buf: &[u8], peer: SocketAddr) -> Result<usize, TransportError> {
        Ok(self.socket.send_to(buf, peer)?)
    }

    fn set_receive_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        // std 不接受零时长超时，零视为无限阻塞
        self.socket.set_read_timeout(timeout.filter(|t| !t.is_zero()))
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}
