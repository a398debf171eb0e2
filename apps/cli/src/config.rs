//! CLI 配置
//!
//! 优先级：命令行参数 > `--config` 指定的文件 > `<config_dir>/qbot/config.toml` > 内置默认值

use anyhow::{Context, Result, bail};
use clap::Args;
use qbot_control::{BehaviorConfig, StraightConfig};
use qbot_driver::LinkConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// 默认配置文件路径
pub fn default_config_file() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("qbot");
    path.push("config.toml");
    Some(path)
}

/// CLI 配置文件内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// 链路配置，地址没有默认值
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkConfig>,

    pub behavior: BehaviorConfig,

    pub straight: StraightConfig,
}

impl CliConfig {
    /// 加载配置
    ///
    /// 显式指定的文件必须存在；默认路径下没有文件时使用内置默认值。
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_file() {
                Some(path) => (path, false),
                None => return Ok((Self::default(), None)),
            },
        };

        if !explicit && !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok((Self::default(), None));
        }

        let config = Self::from_file(&path)?;
        Ok((config, Some(path)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// 链路参数（覆盖配置文件中的 `[link]`）
#[derive(Args, Debug, Clone, Default)]
pub struct LinkArgs {
    /// 机器人地址，如 192.168.0.5:5005
    #[arg(long, global = true)]
    pub robot: Option<SocketAddr>,

    /// 本地绑定地址，如 192.168.0.6:5005
    #[arg(long, global = true)]
    pub base: Option<SocketAddr>,

    /// 接收超时（毫秒）
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

impl LinkArgs {
    /// 合并命令行参数与配置文件，得到最终的链路配置
    pub fn resolve(&self, file: Option<&LinkConfig>) -> Result<LinkConfig> {
        let Some(robot_addr) = self.robot.or(file.map(|l| l.robot_addr)) else {
            bail!("Robot address not set: pass --robot or set [link] robot_addr");
        };
        let Some(base_addr) = self.base.or(file.map(|l| l.base_addr)) else {
            bail!("Base address not set: pass --base or set [link] base_addr");
        };

        let mut link = LinkConfig::new(robot_addr, base_addr);
        if let Some(timeout_ms) = self.timeout_ms.or(file.map(|l| l.timeout_ms)) {
            link = link.with_timeout(Duration::from_millis(timeout_ms));
        }
        link.validate()?;
        Ok(link)
    }
}
