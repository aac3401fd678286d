//! # EGM Driver
//!
//! 本 crate 负责与机器人控制器的 UDP 交换循环：
//! - 持有唯一的数据报套接字（或自定义 `EgmTransport`）
//! - 接收反馈报文、通知观察者、回复固定命令
//! - 序列号、时间戳作为会话字段持有
//! - 取消信号与接收超时，保证可以优雅退出
//!
//! # 状态
//!
//! ```text
//! Idle ──build()──► AwaitingCommandInput ──with_command()──► Listening ──run() 返回──► Shutdown
//! ```
//!
//! 套接字绑定失败是唯一的致命错误；单个数据报的接收、解析、发送错误只跳过当前周期。

mod builder;
mod config;
mod error;
pub mod hooks;
pub mod metrics;
pub mod sequence;
mod server;
pub mod shutdown;
pub mod state;
pub mod transport;

pub use builder::EgmBuilder;
pub use config::ExchangeConfig;
pub use error::DriverError;
pub use hooks::{FeedbackObserver, NoopObserver};
pub use metrics::{ExchangeMetrics, MetricsSnapshot};
pub use sequence::{SequenceCounter, TickClock};
pub use server::{CycleOutcome, EgmServer};
pub use shutdown::ShutdownSignal;
pub use state::{AwaitingCommand, Listening, LoopState, SessionState};
pub use transport::{EgmTransport, TransportError, UdpTransport};
