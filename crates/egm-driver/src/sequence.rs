//! 序列号与粗粒度时间戳
//!
//! 两者都作为会话的字段持有，不使用全局变量。

use std::time::Instant;

/// 出站序列号计数器
///
/// 从 0 开始，每次取值后加 1（后置自增），达到 `u32::MAX` 后回绕。
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    next: u32,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回当前值并自增
    pub fn next_seqno(&mut self) -> u32 {
        let seqno = self.next;
        self.next = self.next.wrapping_add(1);
        seqno
    }

    /// 下一次将要使用的值（不自增）
    pub fn peek(&self) -> u32 {
        self.next
    }
}

/// 毫秒时钟
///
/// 从会话创建开始计时，截断为 32 位（约 49.7 天回绕一次）。
#[derive(Debug, Clone)]
pub struct TickClock {
    start: Instant,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// 当前毫秒数
    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
