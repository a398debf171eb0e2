//! # QuickBot CLI
//!
//! QuickBot 两轮机器人的命令行工具。
//!
//! ```bash
//! # 握手检查
//! qbot-cli --robot 192.168.0.5:5005 --base 192.168.0.6:5005 check
//!
//! # 运行行为控制循环（地址写在配置文件的 [link] 中）
//! qbot-cli --config qbot.toml behave --cycles 600
//!
//! # 调参
//! qbot-cli straight --turn 20
//! qbot-cli ramp --from 30 --to 100
//! ```
//!
//! 日志级别由 `RUST_LOG` 控制，默认 `qbot_cli=info,qbot_control=info`。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{
    BehaveCommand, ConfigCommand, IrSampleCommand, RampCommand, ReadCommand, Session,
    StraightCommand,
};
use config::{CliConfig, LinkArgs};

/// QuickBot CLI - 两轮机器人命令行工具
#[derive(Parser, Debug)]
#[command(name = "qbot-cli")]
#[command(about = "Command-line interface for QuickBot control and tuning", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 <config_dir>/qbot/config.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    link: LinkArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 握手检查
    Check,

    /// 复位机器人端状态
    Reset,

    /// 读取功率、编码器和红外读数
    Read {
        #[command(flatten)]
        args: ReadCommand,
    },

    /// 运行行为控制循环（DRIVE / AVOID / SEARCH）
    Behave {
        #[command(flatten)]
        args: BehaveCommand,
    },

    /// 直线行驶调参
    Straight {
        #[command(flatten)]
        args: StraightCommand,
    },

    /// 功率爬升测试
    Ramp {
        #[command(flatten)]
        args: RampCommand,
    },

    /// 采集红外读数
    IrSample {
        #[command(flatten)]
        args: IrSampleCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("qbot_cli=info,qbot_control=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (config, config_path) = CliConfig::load(cli.config.as_deref())?;
    let session = Session {
        config,
        config_path,
        link_args: cli.link,
    };

    match cli.command {
        Commands::Check => commands::link::check(&session),
        Commands::Reset => commands::link::reset(&session),
        Commands::Read { args } => args.execute(&session),
        Commands::Behave { args } => args.execute(&session),
        Commands::Straight { args } => args.execute(&session),
        Commands::Ramp { args } => args.execute(&session),
        Commands::IrSample { args } => args.execute(&session),
        Commands::Config(cmd) => cmd.execute(&session),
    }
}
