//! 交换循环指标
//!
//! 原子计数器，可以在任何线程读取快照，不引入锁。

use std::sync::atomic::{AtomicU64, Ordering};

/// 交换循环实时指标
///
/// # 使用示例
///
/// ```rust
/// use egm_driver::ExchangeMetrics;
/// use std::sync::Arc;
/// use std::sync::atomic::Ordering;
///
/// let metrics = Arc::new(ExchangeMetrics::default());
/// metrics.datagrams_received.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.datagrams_received, 1);
/// ```
#[derive(Debug, Default)]
pub struct ExchangeMetrics {
    /// 收到的数据报总数（含无法解析的）
    pub datagrams_received: AtomicU64,

    /// 接收超时次数（无流量时的正常现象）
    pub rx_timeouts: AtomicU64,

    /// 接收错误次数
    pub rx_errors: AtomicU64,

    /// 入站报文解析失败次数
    pub decode_errors: AtomicU64,

    /// 成功发送的回复数
    pub replies_sent: AtomicU64,

    /// 发送失败次数
    pub tx_errors: AtomicU64,
}

impl ExchangeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            rx_timeouts: self.rx_timeouts.load(Ordering::Relaxed),
            rx_errors: self.rx_errors.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            replies_sent: self.replies_sent.load(Ordering::Relaxed),
            tx_errors: self.tx_errors.load(Ordering::Relaxed),
        }
    }

    #[inline]
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// 指标快照（普通数据）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub datagrams_received: u64,
    pub rx_timeouts: u64,
    pub rx_errors: u64,
    pub decode_errors: u64,
    pub replies_sent: u64,
    pub tx_errors: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "received={} sent={} rx_errors={} decode_errors={} tx_errors={} rx_timeouts={}",
            self.datagrams_received,
            self.replies_sent,
            self.rx_errors,
            self.decode_errors,
            self.tx_errors,
            self.rx_timeouts
        )
    }
}
