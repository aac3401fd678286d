//! 协议常量定义

/// EGM 默认 UDP 端口
pub const DEFAULT_PORT: u16 = 6510;

/// 单个数据报的最大字节数
pub const MAX_DATAGRAM_SIZE: usize = 1400;

/// 机械臂关节数量
pub const JOINT_COUNT: usize = 6;
