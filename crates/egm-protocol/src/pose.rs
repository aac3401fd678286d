//! 命令位姿定义
//!
//! 一次运行只有一个固定命令：关节空间目标或笛卡尔空间目标。
//! 使用和类型（enum）表达，避免读取错误的变体。

use crate::constants::JOINT_COUNT;
use thiserror::Error;

/// 角度单位
///
/// 仅用于解析操作员输入，核心数据始终以弧度保存关节角。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AngleUnit {
    /// 弧度（协议单位）
    #[default]
    Rad,
    /// 角度
    Deg,
}

impl AngleUnit {
    /// 转换为弧度
    #[inline]
    pub fn to_rad(self, value: f64) -> f64 {
        match self {
            AngleUnit::Rad => value,
            AngleUnit::Deg => value.to_radians(),
        }
    }
}

/// 位姿构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    #[error("Expected {expected} values, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("Invalid number '{token}'")]
    InvalidNumber { token: String },
}

/// 关节空间目标（6 个关节，弧度）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointPose {
    pub joints: [f64; JOINT_COUNT],
}

impl JointPose {
    pub const fn new(joints: [f64; JOINT_COUNT]) -> Self {
        Self { joints }
    }

    /// 从切片构造（必须恰好 6 个值）
    ///
    /// `unit` 为输入值的单位，结果统一为弧度。
    pub fn from_slice(values: &[f64], unit: AngleUnit) -> Result<Self, PoseError> {
        let joints: [f64; JOINT_COUNT] =
            values.try_into().map_err(|_| PoseError::WrongCount {
                expected: JOINT_COUNT,
                actual: values.len(),
            })?;
        Ok(Self {
            joints: joints.map(|v| unit.to_rad(v)),
        })
    }
}

/// 笛卡尔空间目标
///
/// 位置单位 mm；欧拉角以角度保存，编码时转换为弧度。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CartesianPose {
    /// x, y, z（mm）
    pub position: [f64; 3],
    /// roll, pitch, yaw（度）
    pub euler_deg: [f64; 3],
}

impl CartesianPose {
    pub const fn new(position: [f64; 3], euler_deg: [f64; 3]) -> Self {
        Self {
            position,
            euler_deg,
        }
    }

    /// 从 6 个值构造：x y z roll pitch yaw
    pub fn from_slice(values: &[f64]) -> Result<Self, PoseError> {
        if values.len() != 6 {
            return Err(PoseError::WrongCount {
                expected: 6,
                actual: values.len(),
            });
        }
        Ok(Self {
            position: [values[0], values[1], values[2]],
            euler_deg: [values[3], values[4], values[5]],
        })
    }

    /// 欧拉角（弧度）
    pub fn euler_rad(&self) -> [f64; 3] {
        self.euler_deg.map(f64::to_radians)
    }
}

/// 固定命令位姿
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pose {
    Joint(JointPose),
    Cartesian(CartesianPose),
}

impl Pose {
    /// 是否为关节模式
    pub fn is_joint(&self) -> bool {
        matches!(self, Pose::Joint(_))
    }
}

impl From<JointPose> for Pose {
    fn from(pose: JointPose) -> Self {
        Pose::Joint(pose)
    }
}

impl From<CartesianPose> for Pose {
    fn from(pose: CartesianPose) -> Self {
        Pose::Cartesian(pose)
    }
}

/// 解析操作员输入的数值列表
///
/// 接受空白或逗号分隔，例如 `"0.1 0.2, 0.3"`。
pub fn parse_values(input: &str) -> Result<Vec<f64>, PoseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|_| PoseError::InvalidNumber {
                token: token.to_string(),
            })
        })
        .collect()
}
