//! 链路命令：握手、复位、读取传感器

use super::Session;
use anyhow::Result;
use clap::Args;
use qbot_driver::{DriverError, QbMaster};

/// 握手检查
pub fn check(session: &Session) -> Result<()> {
    let link = session.link()?;
    let ok = QbMaster::connect(&link, |master| master.check())?;
    if ok {
        println!("✅ {} 握手成功", link.robot_addr);
        Ok(())
    } else {
        println!("❌ {} 握手应答异常", link.robot_addr);
        Err(DriverError::Handshake.into())
    }
}

/// 复位机器人端状态
pub fn reset(session: &Session) -> Result<()> {
    session.with_robot(|master| {
        master.reset()?;
        println!("✅ 已发送复位命令");
        Ok(())
    })
}

/// 读取传感器命令参数
#[derive(Args, Debug)]
pub struct ReadCommand {
    /// 读取前先复位（编码器计数归零）
    #[arg(long)]
    pub reset: bool,
}

impl ReadCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        session.with_robot(|master| {
            if self.reset {
                master.reset()?;
            }

            let (left_pwm, right_pwm) = master.get_power()?;
            let (left_ticks, right_ticks) = master.get_envalues()?;
            let (left_vel, right_vel) = master.get_envelope()?;
            let ir = master.get_ir_values()?;

            println!("PWM:      {:8.1} {:8.1}", left_pwm, right_pwm);
            println!("Ticks:    {:8.1} {:8.1}", left_ticks, right_ticks);
            println!("Velocity: {:8.1} {:8.1}", left_vel, right_vel);
            println!("IR:       {:?}", ir);
            Ok(())
        })
    }
}
