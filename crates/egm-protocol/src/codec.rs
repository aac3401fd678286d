//! 报文编解码
//!
//! - 出站：由固定命令位姿构建 `EgmSensor` 并序列化
//! - 入站：解析 `EgmRobot`，所有字段均为可选，访问前必须检查

use crate::constants::MAX_DATAGRAM_SIZE;
use crate::messages::egm_header::MessageType;
use crate::messages::*;
use crate::pose::Pose;
use crate::ProtocolError;
use prost::Message;

// ============================================================================
// Outbound
// ============================================================================

/// 构建出站修正报文（未序列化）
///
/// 报文头类型固定为 `MSGTYPE_CORRECTION`。
/// 关节模式下 6 个关节值按原样写入；笛卡尔模式下欧拉角由度转换为弧度，
/// roll/pitch/yaw 分别写入 `euler.x`/`euler.y`/`euler.z`。
pub fn build_sensor_message(pose: &Pose, seqno: u32, tm: u32) -> EgmSensor {
    let header = EgmHeader {
        seqno: Some(seqno),
        tm: Some(tm),
        mtype: Some(MessageType::Correction as i32),
    };

    let planned = match pose {
        Pose::Joint(joint) => EgmPlanned {
            joints: Some(EgmJoints {
                joints: joint.joints.to_vec(),
            }),
            cartesian: None,
        },
        Pose::Cartesian(cart) => {
            let [x, y, z] = cart.position;
            let [roll, pitch, yaw] = cart.euler_rad();
            EgmPlanned {
                joints: None,
                cartesian: Some(EgmPose {
                    pos: Some(EgmCartesian { x, y, z }),
                    orient: None,
                    euler: Some(EgmEuler {
                        x: roll,
                        y: pitch,
                        z: yaw,
                    }),
                }),
            }
        },
    };

    EgmSensor {
        header: Some(header),
        planned: Some(planned),
    }
}

/// 构建并序列化出站报文
pub fn encode_sensor(pose: &Pose, seqno: u32, tm: u32) -> Vec<u8> {
    build_sensor_message(pose, seqno, tm).encode_to_vec()
}

/// 构建并序列化出站报文到已有缓冲区（先清空）
///
/// 返回写入的字节数。
pub fn encode_sensor_into(
    pose: &Pose,
    seqno: u32,
    tm: u32,
    buf: &mut Vec<u8>,
) -> Result<usize, ProtocolError> {
    write_sensor(&build_sensor_message(pose, seqno, tm), buf)
}

/// 序列化已构建的出站报文到缓冲区（先清空）
pub fn write_sensor(message: &EgmSensor, buf: &mut Vec<u8>) -> Result<usize, ProtocolError> {
    buf.clear();
    buf.reserve(message.encoded_len());
    message.encode(buf)?;
    Ok(buf.len())
}

// ============================================================================
// Inbound
// ============================================================================

/// 解析入站反馈报文
///
/// # Errors
/// - `ProtocolError::Oversized`: 超过 1400 字节
/// - `ProtocolError::Decode`: 截断或字段编码错误
pub fn decode_robot(buf: &[u8]) -> Result<EgmRobot, ProtocolError> {
    check_size(buf)?;
    Ok(EgmRobot::decode(buf)?)
}

/// 解析出站修正报文（控制器侧视角，用于测试和调试工具）
pub fn decode_sensor(buf: &[u8]) -> Result<EgmSensor, ProtocolError> {
    check_size(buf)?;
    Ok(EgmSensor::decode(buf)?)
}

fn check_size(buf: &[u8]) -> Result<(), ProtocolError> {
    if buf.len() > MAX_DATAGRAM_SIZE {
        return Err(ProtocolError::Oversized {
            size: buf.len(),
            max: MAX_DATAGRAM_SIZE,
        });
    }
    Ok(())
}

/// 完整报文头（seqno、tm、mtype 均存在）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    pub seqno: u32,
    pub tm: u32,
    /// 线上原始值（未知类型也保留数值）
    pub mtype: i32,
}

impl HeaderFields {
    /// 已知的报文类型
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::try_from(self.mtype).ok()
    }
}

impl EgmHeader {
    /// 三个字段全部存在时返回完整报文头
    pub fn complete(&self) -> Option<HeaderFields> {
        Some(HeaderFields {
            seqno: self.seqno?,
            tm: self.tm?,
            mtype: self.mtype?,
        })
    }
}

impl EgmRobot {
    /// 完整报文头；任一字段缺失返回 `None`
    pub fn header_fields(&self) -> Option<HeaderFields> {
        self.header.as_ref().and_then(EgmHeader::complete)
    }

    /// 反馈关节角（弧度）
    pub fn feedback_joints(&self) -> Option<&[f64]> {
        self.feed_back
            .as_ref()
            .and_then(|fb| fb.joints.as_ref())
            .map(|j| j.joints.as_slice())
    }
}

impl EgmSensor {
    pub fn header_fields(&self) -> Option<HeaderFields> {
        self.header.as_ref().and_then(EgmHeader::complete)
    }

    /// 规划关节角（弧度）
    pub fn planned_joints(&self) -> Option<&[f64]> {
        self.planned
            .as_ref()
            .and_then(|p| p.joints.as_ref())
            .map(|j| j.joints.as_slice())
    }

    /// 规划笛卡尔位姿
    pub fn planned_cartesian(&self) -> Option<&EgmPose> {
        self.planned.as_ref().and_then(|p| p.cartesian.as_ref())
    }
}
