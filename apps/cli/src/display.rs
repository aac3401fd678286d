//! 控制台显示
//!
//! 每条入站报文输出到 stdout（日志走 stderr，互不干扰）。

use egm_driver::FeedbackObserver;
use egm_protocol::{EgmRobot, ProtocolError};
use std::io::{self, Write};
use std::net::SocketAddr;

/// 格式化一条反馈报文（不含换行）
///
/// - 报文头完整：`SeqNo=.. || Tm=.. || Type=..`，随后是关节行（角度）或 `No feedback`
/// - 报文头缺失或不完整：`No header`
pub fn format_robot_message(robot: &EgmRobot) -> Vec<String> {
    let Some(header) = robot.header_fields() else {
        return vec!["No header".to_string()];
    };

    let mut lines = vec![format!(
        "SeqNo={} || Tm={} || Type={}",
        header.seqno, header.tm, header.mtype
    )];
    match robot.feedback_joints() {
        Some(joints) => lines.push(format_joints(joints)),
        None => lines.push("No feedback".to_string()),
    }
    lines
}

/// 关节行：弧度转角度，`%8.2f` 宽度
pub fn format_joints(joints_rad: &[f64]) -> String {
    let fields: Vec<String> = joints_rad
        .iter()
        .map(|rad| format!("{:8.2}", rad.to_degrees()))
        .collect();
    format!("Joint = {}", fields.join(" || "))
}

/// 控制台观察者
pub struct ConsoleDisplay<W: Write + Send> {
    out: W,
}

impl ConsoleDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, lines: &[String]) {
        for line in lines {
            // 显示失败（如管道关闭）不影响交换循环
            if let Err(e) = writeln!(self.out, "{}", line) {
                tracing::debug!("Display write failed: {}", e);
                return;
            }
        }
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> FeedbackObserver for ConsoleDisplay<W> {
    fn on_feedback(&mut self, _peer: SocketAddr, message: &EgmRobot) {
        let lines = format_robot_message(message);
        self.emit(&lines);
    }

    fn on_invalid(&mut self, _peer: SocketAddr, error: &ProtocolError) {
        self.emit(&[format!("Invalid message ({})", error)]);
    }
}
