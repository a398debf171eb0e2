//! 行为控制命令
//!
//! 运行 DRIVE / AVOID / SEARCH 行为循环，直到达到周期数或收到 Ctrl+C。

use super::{Session, install_stop_flag};
use anyhow::Result;
use clap::Args;
use qbot_control::{BehaviorConfig, Rotation, Supervisor, Transition, run_behavior};
use spin_sleep::SpinSleeper;
use std::time::Duration;

/// 行为控制命令参数（覆盖配置文件中的 `[behavior]`）
#[derive(Args, Debug, Default)]
pub struct BehaveCommand {
    /// 控制周期数
    #[arg(long)]
    pub cycles: Option<usize>,

    /// 控制周期（毫秒）
    #[arg(long)]
    pub period_ms: Option<u64>,

    /// 一直运行，直到 Ctrl+C
    #[arg(long, conflicts_with = "cycles")]
    pub forever: bool,

    /// 直线行驶基础功率
    #[arg(long)]
    pub power: Option<f64>,

    /// 寻找方向时的旋转方向
    #[arg(long, value_parser = parse_rotation)]
    pub rotation: Option<Rotation>,
}

fn parse_rotation(s: &str) -> Result<Rotation, String> {
    match s {
        "left" => Ok(Rotation::Left),
        "right" => Ok(Rotation::Right),
        other => Err(format!("expected `left` or `right`, got `{}`", other)),
    }
}

impl BehaveCommand {
    /// 合并命令行参数与配置文件
    pub fn behavior_config(&self, base: &BehaviorConfig) -> BehaviorConfig {
        let mut config = base.clone();
        if let Some(cycles) = self.cycles {
            config.cycles = cycles;
        }
        if let Some(period_ms) = self.period_ms {
            config.period_ms = period_ms;
        }
        if let Some(power) = self.power {
            config.drive.power = power;
        }
        if let Some(rotation) = self.rotation {
            config.search.rotation = rotation;
        }
        config
    }

    pub fn execute(&self, session: &Session) -> Result<()> {
        let behavior = self.behavior_config(&session.config.behavior);
        let mut loop_config = behavior.loop_config();
        if self.forever {
            loop_config.max_cycles = None;
        }

        let stop = install_stop_flag()?;

        let report = session.with_robot(|master| {
            master.reset()?;
            // 等待复位生效
            SpinSleeper::default().sleep(Duration::from_millis(behavior.period_ms));

            let mut supervisor = Supervisor::from_config(&behavior);
            supervisor.transitions().subscribe(|t: &Transition| {
                println!("🔀 {} -> {} ({})", t.from, t.to, t.event);
            });

            Ok(run_behavior(master, &mut supervisor, &loop_config, &stop)?)
        })?;

        if report.interrupted {
            println!("🛑 已中断: {} 个周期，结束于 {}", report.cycles, report.behavior);
        } else {
            println!("✅ 完成: {} 个周期，结束于 {}", report.cycles, report.behavior);
        }
        Ok(())
    }
}
