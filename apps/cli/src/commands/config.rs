//! 配置管理命令

use super::Session;
use crate::config::default_config_file;
use anyhow::Result;
use clap::Subcommand;

/// 配置命令
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// 打印生效的配置（TOML）
    Show,

    /// 打印配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, session: &Session) -> Result<()> {
        match self {
            ConfigCommand::Show => Self::show_(session),
            ConfigCommand::Path => Self::path_(session),
        }
    }

    fn show_(session: &Session) -> Result<()> {
        let mut config = session.config.clone();
        // 命令行覆盖的链路参数也体现在输出中
        if let Ok(link) = session.link() {
            config.link = Some(link);
        }

        match &session.config_path {
            Some(path) => println!("# Loaded from {}", path.display()),
            None => println!("# Built-in defaults"),
        }
        print!("{}", config.to_toml()?);
        Ok(())
    }

    fn path_(session: &Session) -> Result<()> {
        match session.config_path.clone().or_else(default_config_file) {
            Some(path) => println!("{}", path.display()),
            None => println!("(无法确定配置目录)"),
        }
        Ok(())
    }
}
