//! 调参与标定命令

use super::{Session, install_stop_flag};
use anyhow::{Context, Result, ensure};
use clap::Args;
use qbot_control::{StraightConfig, StraightSample, collect_ir_samples, ramp, run_straight};
use qbot_driver::RobotLink;
use serde::Serialize;
use spin_sleep::SpinSleeper;
use std::time::Duration;

/// 直线行驶调参命令参数（覆盖配置文件中的 `[straight]`）
#[derive(Args, Debug, Default)]
pub struct StraightCommand {
    /// 目标计数差（右轮 - 左轮）
    #[arg(long, allow_hyphen_values = true)]
    pub turn: Option<i64>,

    /// 基础功率
    #[arg(long)]
    pub power: Option<f64>,

    /// 控制周期数
    #[arg(long)]
    pub cycles: Option<usize>,

    /// 以 TOML 输出采样（便于离线分析）
    #[arg(long)]
    pub toml: bool,
}

#[derive(Serialize)]
struct StraightReport<'a> {
    samples: &'a [StraightSample],
}

impl StraightCommand {
    pub fn straight_config(&self, base: &StraightConfig) -> StraightConfig {
        let mut config = base.clone();
        if let Some(turn) = self.turn {
            config.turn = turn;
        }
        if let Some(power) = self.power {
            config.power = power;
        }
        if let Some(cycles) = self.cycles {
            config.cycles = cycles;
        }
        config
    }

    pub fn execute(&self, session: &Session) -> Result<()> {
        let config = self.straight_config(&session.config.straight);
        let stop = install_stop_flag()?;

        let samples = session.with_robot(|master| {
            master.reset()?;
            Ok(run_straight(master, &config, &stop)?)
        })?;

        if self.toml {
            let report = StraightReport { samples: &samples };
            print!("{}", toml::to_string(&report).context("Failed to serialize samples")?);
            return Ok(());
        }

        println!("{:>7} {:>7} {:>7} {:>7} {:>7}", "skew", "left", "right", "pwm_l", "pwm_r");
        for s in &samples {
            match s.pwm {
                Some(pwm) => println!(
                    "{:7} {:7} {:7} {:7} {:7}",
                    s.skew(),
                    s.left_ticks,
                    s.right_ticks,
                    pwm.left,
                    pwm.right
                ),
                None => println!("{:7} {:7} {:7}", s.skew(), s.left_ticks, s.right_ticks),
            }
        }
        Ok(())
    }
}

/// 功率爬升命令参数
#[derive(Args, Debug)]
pub struct RampCommand {
    /// 起始功率
    #[arg(long, default_value_t = 30.0)]
    pub from: f64,

    /// 目标功率
    #[arg(long, default_value_t = 100.0)]
    pub to: f64,

    /// 单程时长（毫秒）
    #[arg(long, default_value_t = 500)]
    pub duration_ms: u64,

    /// 单程下发的功率值个数
    #[arg(long, default_value_t = 10)]
    pub samples: usize,

    /// 在目标功率保持的时长（毫秒）
    #[arg(long, default_value_t = 1500)]
    pub hold_ms: u64,
}

impl RampCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        ensure!(self.samples > 0, "--samples must be > 0");
        let duration = Duration::from_millis(self.duration_ms);
        let sleeper = SpinSleeper::default();

        session.with_robot(|master| {
            master.reset()?;

            ramp(master, self.from, self.to, duration, self.samples)?;
            sleeper.sleep(Duration::from_millis(self.hold_ms));
            let (left, right) = master.get_envelope()?;
            println!("Velocity at {:.0}: {:8.1} {:8.1}", self.to, left, right);

            ramp(master, self.to, self.from, duration, self.samples)?;
            master.stop()?;
            sleeper.sleep(Duration::from_millis(500));

            let (left, right) = master.get_envalues()?;
            println!("Ticks:    {:8.1} {:8.1}", left, right);
            Ok(())
        })
    }
}

/// 红外采样命令参数
#[derive(Args, Debug)]
pub struct IrSampleCommand {
    /// 采样次数
    #[arg(long, default_value_t = 100)]
    pub count: usize,

    /// 采样间隔（毫秒）
    #[arg(long, default_value_t = 50)]
    pub period_ms: u64,
}

impl IrSampleCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        let period = Duration::from_millis(self.period_ms);
        let samples =
            session.with_robot(|master| Ok(collect_ir_samples(master, self.count, period)?))?;

        for ir in &samples {
            let row: Vec<String> = ir.iter().map(|v| format!("{:7.1}", v)).collect();
            println!("{}", row.join(" "));
        }
        Ok(())
    }
}
