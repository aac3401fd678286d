//! 交互式命令输入
//!
//! 套接字绑定后、进入监听前，向操作员询问一次固定命令。
//! 输入错误时重新提示当前步骤，输入流结束时返回错误。

use egm_protocol::{AngleUnit, CartesianPose, JOINT_COUNT, JointPose, Pose, PoseError, parse_values};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input closed before a command was entered")]
    Closed,

    #[error("Console I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Pose(#[from] PoseError),
}

/// 询问命令位姿
///
/// - `c`：笛卡尔位置（mm）+ 欧拉角（度），分两步输入
/// - `j`：6 个关节值，单位由 `unit` 决定
pub fn prompt_pose<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    unit: AngleUnit,
) -> Result<Pose, InputError> {
    loop {
        writeln!(
            out,
            "Commands: c = set Cartesian pose command, j = set joint pose command"
        )?;
        let line = read_line(input, out)?;

        match line.trim().to_ascii_lowercase().as_str() {
            "c" => {
                let position = read_values(
                    input,
                    out,
                    "Please specify the Cartesian position (mm) for the robot.",
                    3,
                )?;
                let euler = read_values(
                    input,
                    out,
                    "Please specify the Euler angle orientation (degree) for the robot.",
                    3,
                )?;
                return Ok(CartesianPose::new(
                    [position[0], position[1], position[2]],
                    [euler[0], euler[1], euler[2]],
                )
                .into());
            },
            "j" => {
                let prompt = match unit {
                    AngleUnit::Rad => "Please specify the joint pose (radian) for the robot.",
                    AngleUnit::Deg => "Please specify the joint pose (degree) for the robot.",
                };
                let values = read_values(input, out, prompt, JOINT_COUNT)?;
                return Ok(JointPose::from_slice(&values, unit)?.into());
            },
            "" => {},
            other => writeln!(out, "Unknown command '{}'", other)?,
        }
    }
}

fn read_line<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String, InputError> {
    write!(out, "> ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(InputError::Closed);
    }
    Ok(line)
}

/// 读取恰好 `count` 个数值
///
/// 数值可以分布在多行，凑满 `count` 个为止。
/// 出现无效数字或一行后总数超过 `count` 时丢弃已读数值并重新提示。
fn read_values<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    count: usize,
) -> Result<Vec<f64>, InputError> {
    writeln!(out, "{}", prompt)?;
    let mut values = Vec::with_capacity(count);
    loop {
        let line = read_line(input, out)?;

        match parse_values(&line) {
            Ok(parsed) => {
                values.extend(parsed);
                if values.len() == count {
                    return Ok(values);
                }
                if values.len() > count {
                    writeln!(
                        out,
                        "{}",
                        PoseError::WrongCount {
                            expected: count,
                            actual: values.len()
                        }
                    )?;
                    values.clear();
                    writeln!(out, "{}", prompt)?;
                }
            },
            Err(e) => {
                writeln!(out, "{}", e)?;
                values.clear();
                writeln!(out, "{}", prompt)?;
            },
        }
    }
}
