//! Type State Machine - 编译期状态安全
//!
//! 使用零大小类型（ZST）标记会话状态，在编译期保证：
//! 没有命令位姿时无法进入交换循环。

use egm_protocol::Pose;

/// 运行时可见的循环状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// 尚未创建套接字
    Idle,
    /// 套接字已绑定，等待操作员命令
    AwaitingCommandInput,
    /// 交换循环运行中
    Listening,
    /// 已停止，套接字已释放
    Shutdown,
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoopState::Idle => "Idle",
            LoopState::AwaitingCommandInput => "AwaitingCommandInput",
            LoopState::Listening => "Listening",
            LoopState::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}

/// 会话状态标记
pub trait SessionState {
    const STATE: LoopState;
}

/// 等待命令状态
///
/// 套接字已绑定，尚未设置命令位姿。
pub struct AwaitingCommand;

/// 监听状态
///
/// 命令位姿已固定，整个会话期间不再改变。
pub struct Listening {
    pub(crate) pose: Pose,
}

impl SessionState for AwaitingCommand {
    const STATE: LoopState = LoopState::AwaitingCommandInput;
}

impl SessionState for Listening {
    const STATE: LoopState = LoopState::Listening;
}
