//! # EGM CLI
//!
//! 向机器人控制器持续发送一个固定位姿命令，并在控制台显示反馈。
//!
//! ```bash
//! # 交互式输入命令（c = 笛卡尔，j = 关节）
//! egm-cli
//!
//! # 直接给出关节命令（弧度）
//! egm-cli joint 0.1 0.2 0.3 0.4 0.5 0.6
//!
//! # 关节命令以角度输入
//! egm-cli --joint-unit deg joint 0 0 0 0 30 0
//!
//! # 笛卡尔命令：位置 mm，欧拉角度
//! egm-cli cartesian --pos 600,0,800 --euler 180,0,90
//!
//! # 从配置文件读取端口与命令
//! egm-cli --config egm.toml
//! ```
//!
//! Ctrl+C 优雅退出并打印统计；再次 Ctrl+C 立即退出。

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use egm_driver::{EgmBuilder, ExchangeConfig, ShutdownSignal};
use egm_protocol::{AngleUnit, CartesianPose, JointPose, Pose};
use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use std::process;
use tracing::info;

mod config;
mod display;
mod input;

use config::{FileConfig, timeout_from_ms};
use display::ConsoleDisplay;

/// EGM CLI - 固定位姿命令响应器
#[derive(Parser, Debug)]
#[command(name = "egm-cli")]
#[command(about = "Stream a fixed pose command to a robot controller over EGM", long_about = None)]
#[command(version)]
struct Cli {
    /// 本地 UDP 端口
    ///
    /// 默认: 6510
    #[arg(short, long)]
    port: Option<u16>,

    /// 本地绑定 IP
    ///
    /// 默认: 0.0.0.0
    #[arg(long)]
    bind: Option<IpAddr>,

    /// 接收超时（毫秒），0 表示无限阻塞
    ///
    /// 默认: 100
    #[arg(long)]
    receive_timeout_ms: Option<u64>,

    /// 配置文件路径（TOML）
    ///
    /// 默认: <config_dir>/egm/config.toml（存在时）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 关节输入单位
    #[arg(long, value_enum, default_value_t = JointUnit::Rad)]
    joint_unit: JointUnit,

    /// 调试日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 关节空间命令（6 个值）
    Joint {
        #[arg(num_args = 1.., allow_negative_numbers = true, value_delimiter = ',')]
        values: Vec<f64>,
    },

    /// 笛卡尔空间命令
    Cartesian {
        /// 位置 x,y,z（mm）
        #[arg(long, num_args = 1.., allow_negative_numbers = true, value_delimiter = ',')]
        pos: Vec<f64>,

        /// 欧拉角 roll,pitch,yaw（度）
        #[arg(long, num_args = 1.., allow_negative_numbers = true, value_delimiter = ',')]
        euler: Vec<f64>,
    },

    /// 交互式输入（忽略配置文件中的命令）
    Interactive,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum JointUnit {
    Rad,
    Deg,
}

impl From<JointUnit> for AngleUnit {
    fn from(unit: JointUnit) -> Self {
        match unit {
            JointUnit::Rad => AngleUnit::Rad,
            JointUnit::Deg => AngleUnit::Deg,
        }
    }
}

/// 命令来源
#[derive(Debug, PartialEq)]
enum CommandSource {
    Preset(Pose),
    Prompt,
}

impl Cli {
    /// 配置文件之上叠加命令行参数
    fn exchange_config(&self, file: &FileConfig) -> ExchangeConfig {
        let mut config = file.exchange_config();
        if let Some(ip) = self.bind {
            config.bind_addr.set_ip(ip);
        }
        if let Some(port) = self.port {
            config.bind_addr.set_port(port);
        }
        if let Some(ms) = self.receive_timeout_ms {
            config.receive_timeout = timeout_from_ms(ms);
        }
        config
    }

    /// 子命令 > 配置文件 > 交互输入
    fn command_source(&self, file: &FileConfig) -> Result<CommandSource> {
        let unit = AngleUnit::from(self.joint_unit);
        let pose = match &self.command {
            Some(Commands::Joint { values }) => {
                JointPose::from_slice(values, unit).context("Invalid joint command")?.into()
            },
            Some(Commands::Cartesian { pos, euler }) => {
                if pos.len() != 3 || euler.len() != 3 {
                    anyhow::bail!(
                        "Cartesian command needs 3 position and 3 Euler values, got {} and {}",
                        pos.len(),
                        euler.len()
                    );
                }
                CartesianPose::new([pos[0], pos[1], pos[2]], [euler[0], euler[1], euler[2]])
                    .into()
            },
            Some(Commands::Interactive) => return Ok(CommandSource::Prompt),
            None => match &file.command {
                Some(section) => section
                    .to_pose()
                    .context("Invalid [command] table in config file")?,
                None => return Ok(CommandSource::Prompt),
            },
        };
        Ok(CommandSource::Preset(pose))
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in [format!("egm_cli={level}"), format!("egm_driver={level}")] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = FileConfig::load(cli.config.as_deref())?;
    let exchange = cli.exchange_config(&file);
    let source = cli.command_source(&file)?;

    let shutdown = ShutdownSignal::new();
    let handler_signal = shutdown.clone();
    ctrlc::set_handler(move || {
        if handler_signal.is_triggered() {
            eprintln!("\nInterrupted again, exiting immediately.");
            process::exit(130);
        }
        eprintln!("\nReceived interrupt signal. Shutting down...");
        handler_signal.trigger();
    })
    .context("Failed to set signal handler")?;

    // Idle → AwaitingCommandInput
    let server = EgmBuilder::new()
        .config(exchange)
        .observer(ConsoleDisplay::stdout())
        .build()
        .context("Failed to set up the EGM socket")?;
    if let Ok(addr) = server.local_addr() {
        eprintln!("EGM responder bound on {}", addr);
    }

    let pose = match source {
        CommandSource::Preset(pose) => pose,
        CommandSource::Prompt => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            input::prompt_pose(&mut stdin.lock(), &mut stdout, cli.joint_unit.into())
                .context("No command entered")?
        },
    };
    info!(?pose, "Command accepted");

    // AwaitingCommandInput → Listening → Shutdown
    let snapshot = server.with_command(pose).run(&shutdown);
    println!("Exchange finished: {}", snapshot);
    Ok(())
}
