//! 测试公共设施：脚本化传输与反馈报文构造

#![allow(dead_code)]

use egm_driver::{EgmTransport, ShutdownSignal, TransportError};
use egm_protocol::messages::{EgmFeedBack, EgmJoints};
use egm_protocol::{EgmHeader, EgmRobot, MessageType};
use prost::Message;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// 脚本化的接收事件
pub enum Inbound {
    Datagram(Vec<u8>, SocketAddr),
    Timeout,
    Error(io::ErrorKind),
}

/// MockTransport 用于测试
///
/// 接收队列为空时返回 `Timeout`，并（如果设置了）触发取消信号。
pub struct MockTransport {
    pub inbound: Arc<Mutex<VecDeque<Inbound>>>,
    pub sent: Arc<Mutex<Vec<(Vec<u8>, SocketAddr)>>>,
    pub fail_sends: Arc<Mutex<usize>>,
    pub shutdown_when_drained: Option<ShutdownSignal>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_sends: Arc::new(Mutex::new(0)),
            shutdown_when_drained: None,
        }
    }

    /// 共享同一组队列的句柄（交给会话后仍可观察）
    pub fn handle(&self) -> Self {
        Self {
            inbound: self.inbound.clone(),
            sent: self.sent.clone(),
            fail_sends: self.fail_sends.clone(),
            shutdown_when_drained: self.shutdown_when_drained.clone(),
        }
    }

    pub fn queue(&self, event: Inbound) {
        self.inbound.lock().unwrap().push_back(event);
    }

    pub fn queue_datagram(&self, bytes: Vec<u8>, from: SocketAddr) {
        self.queue(Inbound::Datagram(bytes, from));
    }

    /// 接下来 n 次发送失败
    pub fn fail_next_sends(&self, n: usize) {
        *self.fail_sends.lock().unwrap() = n;
    }

    pub fn sent(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        self.sent.lock().unwrap().clone()
    }
}

impl EgmTransport for MockTransport {
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, SocketAddr), TransportError> {
        match self.inbound.lock().unwrap().pop_front() {
            Some(Inbound::Datagram(bytes, from)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok((n, from))
            },
            Some(Inbound::Timeout) => Err(TransportError::Timeout),
            Some(Inbound::Error(kind)) => Err(TransportError::Io(io::Error::from(kind))),
            None => {
                if let Some(signal) = &self.shutdown_when_drained {
                    signal.trigger();
                }
                Err(TransportError::Timeout)
            },
        }
    }

    fn send_to(&mut self, buf: &[u8], peer: SocketAddr) -> Result<usize, TransportError> {
        let mut fail = self.fail_sends.lock().unwrap();
        if *fail > 0 {
            *fail -= 1;
            return Err(TransportError::Io(io::Error::from(
                io::ErrorKind::HostUnreachable,
            )));
        }
        self.sent.lock().unwrap().push((buf.to_vec(), peer));
        Ok(buf.len())
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Ok("127.0.0.1:6510".parse().unwrap())
    }
}

/// 构造一条完整的反馈报文
pub fn feedback(seqno: u32, tm: u32, joints: [f64; 6]) -> Vec<u8> {
    EgmRobot {
        header: Some(EgmHeader {
            seqno: Some(seqno),
            tm: Some(tm),
            mtype: Some(MessageType::Data as i32),
        }),
        feed_back: Some(EgmFeedBack {
            joints: Some(EgmJoints {
                joints: joints.to_vec(),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
    .encode_to_vec()
}

/// 在反馈报文末尾重复追加 `utilization_rate` 字段，直到长度至少为 `min_len`
///
/// 重复的标量字段以最后一个为准，填充后的报文本身仍然合法。
pub fn padded_feedback(min_len: usize) -> Vec<u8> {
    let mut bytes = feedback(1, 1, [0.0; 6]);
    while bytes.len() < min_len {
        // tag 10, wire type 1 (64-bit)
        bytes.push((10 << 3) | 1);
        bytes.extend_from_slice(&50.0_f64.to_le_bytes());
    }
    bytes
}

pub fn robot_addr() -> SocketAddr {
    "192.168.125.1:6510".parse().unwrap()
}
