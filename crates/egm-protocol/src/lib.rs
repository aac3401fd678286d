//! # EGM Protocol
//!
//! EGM（Externally Guided Motion）报文定义与编解码（无 IO 依赖）
//!
//! ## 模块
//!
//! - `constants`: 协议常量（端口、数据报上限、关节数）
//! - `messages`: `abb.egm` proto2 报文结构
//! - `pose`: 固定命令位姿（关节/笛卡尔）
//! - `codec`: 出站报文构建与入站报文解析
//!
//! ## 单位
//!
//! 线上所有数值为 IEEE-754 double；关节角与欧拉角为弧度，位置为毫米。
//!
//! ```rust
//! use egm_protocol::{JointPose, Pose, decode_sensor, encode_sensor};
//!
//! let pose = Pose::Joint(JointPose::new([0.1, 0.2, 0.3, 0.4, 0.5, 0.6]));
//! let bytes = encode_sensor(&pose, 0, 0);
//! let sensor = decode_sensor(&bytes).unwrap();
//! assert_eq!(sensor.planned_joints(), Some(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6][..]));
//! ```

pub mod codec;
pub mod constants;
pub mod messages;
pub mod pose;

// 重新导出常用类型
pub use codec::*;
pub use constants::*;
pub use messages::egm_header::MessageType;
pub use messages::{EgmHeader, EgmRobot, EgmSensor};
pub use pose::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// 截断或字段编码错误
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// 缓冲区容量不足（仅在固定容量缓冲区上出现）
    #[error("Encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("Datagram too large: {size} bytes (max {max})")]
    Oversized { size: usize, max: usize },
}
