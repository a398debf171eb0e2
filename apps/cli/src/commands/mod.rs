//! 命令定义和实现

pub mod behave;
pub mod config;
pub mod link;
pub mod tune;

pub use behave::BehaveCommand;
pub use config::ConfigCommand;
pub use link::ReadCommand;
pub use tune::{IrSampleCommand, RampCommand, StraightCommand};

use crate::config::{CliConfig, LinkArgs};
use anyhow::{Context, Result, ensure};
use qbot_driver::{DriverError, LinkConfig, QbMaster, RobotLink};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// 一次命令执行所需的上下文
#[derive(Debug)]
pub struct Session {
    pub config: CliConfig,
    /// 实际加载的配置文件（None 表示使用默认值）
    pub config_path: Option<PathBuf>,
    pub link_args: LinkArgs,
}

impl Session {
    /// 最终的链路配置
    pub fn link(&self) -> Result<LinkConfig> {
        self.link_args.resolve(self.config.link.as_ref())
    }

    /// 连接机器人、握手，然后执行 `f`
    ///
    /// `f` 出错时尽量停车；socket 在 `f` 返回后关闭（包括出错）。
    pub fn with_robot<T>(&self, f: impl FnOnce(&mut QbMaster) -> Result<T>) -> Result<T> {
        let link = self.link()?;
        info!("Connecting to {} from {}", link.robot_addr, link.base_addr);

        QbMaster::connect(&link, |master| {
            ensure!(master.check()?, DriverError::Handshake);
            f(master).inspect_err(|_| {
                // 命令中途失败时电机可能仍在转动
                if let Err(e) = master.stop() {
                    warn!("Failed to stop motors: {}", e);
                }
            })
        })
        .with_context(|| format!("Session with robot at {} failed", link.robot_addr))
    }
}

/// 安装 Ctrl+C 处理器，返回停止标志
///
/// 处理器只置位标志，由控制循环在周期之间检查并停车。
pub fn install_stop_flag() -> Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nReceived interrupt signal. Stopping motors...");
        flag.store(true, Ordering::Relaxed);
    })
    .context("Failed to set signal handler")?;
    Ok(stop)
}
