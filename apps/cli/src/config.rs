//! 配置文件
//!
//! TOML 格式，全部字段可选：
//!
//! ```toml
//! [exchange]
//! bind = "0.0.0.0"
//! port = 6510
//! receive_timeout_ms = 100   # 0 表示无限阻塞
//!
//! [command]
//! mode = "joint"
//! unit = "deg"
//! joints = [0.0, 0.0, 0.0, 0.0, 30.0, 0.0]
//! ```
//!
//! 优先级：命令行参数 > 配置文件 > 默认值。

use anyhow::{Context, Result};
use egm_driver::ExchangeConfig;
use egm_protocol::{AngleUnit, CartesianPose, JointPose, Pose, PoseError};
use serde::Deserialize;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件路径（`<config_dir>/egm/config.toml`）
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("egm");
    path.push("config.toml");
    Some(path)
}

/// 配置文件内容
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub exchange: ExchangeSection,

    pub command: Option<CommandSection>,
}

/// `[exchange]` 表
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExchangeSection {
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
    pub receive_timeout_ms: Option<u64>,
}

/// `[command]` 表
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CommandSection {
    Joint {
        joints: Vec<f64>,
        #[serde(default)]
        unit: AngleUnit,
    },
    Cartesian {
        /// x, y, z（mm）
        position: [f64; 3],
        /// roll, pitch, yaw（度）
        euler: [f64; 3],
    },
}

impl CommandSection {
    pub fn to_pose(&self) -> Result<Pose, PoseError> {
        match self {
            CommandSection::Joint { joints, unit } => {
                JointPose::from_slice(joints, *unit).map(Pose::from)
            },
            CommandSection::Cartesian { position, euler } => {
                Ok(CartesianPose::new(*position, *euler).into())
            },
        }
    }
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config file")
    }

    /// 加载配置
    ///
    /// - 显式给出的路径必须存在
    /// - 未给出时尝试默认路径，不存在则使用默认配置
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("While loading {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Config file loaded");
        Ok(config)
    }

    /// 在默认值之上叠加 `[exchange]` 表
    pub fn exchange_config(&self) -> ExchangeConfig {
        let mut config = ExchangeConfig::default();
        self.exchange.apply(&mut config);
        config
    }
}

impl ExchangeSection {
    pub fn apply(&self, config: &mut ExchangeConfig) {
        if let Some(ip) = self.bind {
            config.bind_addr.set_ip(ip);
        }
        if let Some(port) = self.port {
            config.bind_addr.set_port(port);
        }
        if let Some(ms) = self.receive_timeout_ms {
            config.receive_timeout = timeout_from_ms(ms);
        }
    }
}

/// 毫秒转超时；0 表示无限阻塞
pub fn timeout_from_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
