//! EGM 报文结构定义（`abb.egm` proto2 schema）
//!
//! 使用 `prost` derive 直接声明，不依赖 `protoc` 代码生成。
//! 只保留本客户端收发会用到的消息；控制器发送的其它字段在解码时被忽略。
//!
//! # proto2 语义
//!
//! - `optional` 字段映射为 `Option<T>`，解码后必须检查是否存在
//! - `repeated double` 使用非 packed 编码（与控制器一致），解码同时接受两种编码
//! - `required` 字段总是编码；缺失时解码为默认值

// ============================================================================
// Header
// ============================================================================

/// 报文头
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmHeader {
    /// 序列号
    #[prost(uint32, optional, tag = "1")]
    pub seqno: Option<u32>,
    /// 时间戳（毫秒）
    #[prost(uint32, optional, tag = "2")]
    pub tm: Option<u32>,
    /// 报文类型
    #[prost(enumeration = "egm_header::MessageType", optional, tag = "3")]
    pub mtype: Option<i32>,
}

/// `EgmHeader` 嵌套类型
pub mod egm_header {
    /// 报文类型
    ///
    /// 数值即线上编码值（例如 `Correction` = 3）。
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum MessageType {
        Undefined = 0,
        /// 控制器 → 传感器：命令
        Command = 1,
        /// 控制器 → 传感器：数据
        Data = 2,
        /// 传感器 → 控制器：位置修正
        Correction = 3,
        /// 传感器 → 控制器：路径修正
        PathCorrection = 4,
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// 笛卡尔位置（mm）
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmCartesian {
    #[prost(double, required, tag = "1")]
    pub x: f64,
    #[prost(double, required, tag = "2")]
    pub y: f64,
    #[prost(double, required, tag = "3")]
    pub z: f64,
}

/// 四元数姿态
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmQuaternion {
    #[prost(double, required, tag = "1")]
    pub u0: f64,
    #[prost(double, required, tag = "2")]
    pub u1: f64,
    #[prost(double, required, tag = "3")]
    pub u2: f64,
    #[prost(double, required, tag = "4")]
    pub u3: f64,
}

/// 欧拉角姿态（弧度）
///
/// `x`/`y`/`z` 分别对应 roll/pitch/yaw。
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmEuler {
    #[prost(double, required, tag = "1")]
    pub x: f64,
    #[prost(double, required, tag = "2")]
    pub y: f64,
    #[prost(double, required, tag = "3")]
    pub z: f64,
}

/// 位姿：位置 + 姿态（四元数或欧拉角）
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmPose {
    #[prost(message, optional, tag = "1")]
    pub pos: Option<EgmCartesian>,
    #[prost(message, optional, tag = "2")]
    pub orient: Option<EgmQuaternion>,
    #[prost(message, optional, tag = "3")]
    pub euler: Option<EgmEuler>,
}

/// 关节角（弧度）
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmJoints {
    #[prost(double, repeated, packed = "false", tag = "1")]
    pub joints: Vec<f64>,
}

// ============================================================================
// Payloads
// ============================================================================

/// 规划运动（传感器下发的目标）
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmPlanned {
    #[prost(message, optional, tag = "1")]
    pub joints: Option<EgmJoints>,
    #[prost(message, optional, tag = "2")]
    pub cartesian: Option<EgmPose>,
}

/// 实际反馈（控制器上报）
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmFeedBack {
    #[prost(message, optional, tag = "1")]
    pub joints: Option<EgmJoints>,
    #[prost(message, optional, tag = "2")]
    pub cartesian: Option<EgmPose>,
    #[prost(message, optional, tag = "3")]
    pub external_joints: Option<EgmJoints>,
}

/// 电机状态
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmMotorState {
    #[prost(enumeration = "egm_motor_state::MotorStateType", required, tag = "1")]
    pub state: i32,
}

/// `EgmMotorState` 嵌套类型
pub mod egm_motor_state {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum MotorStateType {
        MotorsUndefined = 0,
        MotorsOn = 1,
        MotorsOff = 2,
    }
}

/// EGM 运动控制接口（MCI）状态
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmMciState {
    #[prost(enumeration = "egm_mci_state::MciStateType", required, tag = "1")]
    pub state: i32,
}

/// `EgmMciState` 嵌套类型
pub mod egm_mci_state {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum MciStateType {
        MciUndefined = 0,
        MciError = 1,
        MciStopped = 2,
        MciRunning = 3,
    }
}

/// RAPID 程序执行状态
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmRapidCtrlExecState {
    #[prost(enumeration = "egm_rapid_ctrl_exec_state::RapidCtrlExecStateType", required, tag = "1")]
    pub state: i32,
}

/// `EgmRapidCtrlExecState` 嵌套类型
pub mod egm_rapid_ctrl_exec_state {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum RapidCtrlExecStateType {
        RapidUndefined = 0,
        RapidStopped = 1,
        RapidRunning = 2,
    }
}

// ============================================================================
// Top-level messages
// ============================================================================

/// 控制器 → 传感器（入站反馈报文）
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmRobot {
    #[prost(message, optional, tag = "1")]
    pub header: Option<EgmHeader>,
    #[prost(message, optional, tag = "2")]
    pub feed_back: Option<EgmFeedBack>,
    #[prost(message, optional, tag = "3")]
    pub planned: Option<EgmPlanned>,
    #[prost(message, optional, tag = "4")]
    pub motor_state: Option<EgmMotorState>,
    #[prost(message, optional, tag = "5")]
    pub mci_state: Option<EgmMciState>,
    #[prost(bool, optional, tag = "6")]
    pub mci_convergence_met: Option<bool>,
    #[prost(message, optional, tag = "8")]
    pub rapid_exec_state: Option<EgmRapidCtrlExecState>,
    #[prost(double, optional, tag = "10")]
    pub utilization_rate: Option<f64>,
}

/// 传感器 → 控制器（出站命令报文）
#[derive(Clone, PartialEq, prost::Message)]
pub struct EgmSensor {
    #[prost(message, optional, tag = "1")]
    pub header: Option<EgmHeader>,
    #[prost(message, optional, tag = "2")]
    pub planned: Option<EgmPlanned>,
}
