//! Loop Runner - 行为控制循环
//!
//! 每个周期严格按顺序执行：
//!
//! 1. 休眠一个周期（`spin_sleep`）
//! 2. 读取红外距离值，再读取编码器计数
//! 3. 调用 [`Supervisor::execute`]
//! 4. 钳位到 `[-100, 100]` 并下发功率
//!
//! 所有链路错误（超时、应答解析失败）都会终止循环并返回给调用方，
//! 不做重试，也不会使用过期的传感器数据继续运行。

use crate::config::LoopConfig;
use crate::error::ControlError;
use crate::supervisor::{Behavior, Supervisor};
use crate::types::SensorSnapshot;
use qbot_driver::RobotLink;
use spin_sleep::SpinSleeper;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

/// 循环结束时的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    /// 实际执行的周期数
    pub cycles: usize,
    /// 结束时激活的行为
    pub behavior: Behavior,
    /// 是否由停止标志提前结束
    pub interrupted: bool,
}

/// 读取一份传感器快照
pub fn read_snapshot<L: RobotLink>(link: &mut L) -> Result<SensorSnapshot, ControlError> {
    let ir = link.read_ir()?;
    let encoders = link.read_encoders()?;
    Ok(SensorSnapshot::from_readings(encoders, ir))
}

/// 运行行为控制循环
///
/// 直到达到 `config.max_cycles` 或 `stop` 被置位为止。正常结束时下发停止命令；
/// 出错时尽量下发停止命令，然后返回原始错误。
pub fn run_behavior<L: RobotLink>(
    link: &mut L,
    supervisor: &mut Supervisor,
    config: &LoopConfig,
    stop: &AtomicBool,
) -> Result<LoopReport, ControlError> {
    config.validate()?;

    let sleeper = SpinSleeper::default();
    let mut cycles = 0;
    let mut interrupted = false;

    let result = loop {
        if let Some(max) = config.max_cycles
            && cycles >= max
        {
            break Ok(());
        }
        if stop.load(Ordering::Relaxed) {
            info!("Stop requested after {} cycles", cycles);
            interrupted = true;
            break Ok(());
        }

        sleeper.sleep(config.period);

        if let Err(e) = step(link, supervisor) {
            break Err(e);
        }
        cycles += 1;
    };

    match result {
        Ok(()) => {
            link.stop()?;
            Ok(LoopReport {
                cycles,
                behavior: supervisor.active(),
                interrupted,
            })
        },
        Err(e) => {
            error!("Control loop failed at cycle {}: {}", cycles + 1, e);
            if let Err(stop_err) = link.stop() {
                error!("Failed to stop motors: {}", stop_err);
            }
            Err(e)
        },
    }
}

/// 单个控制周期（不含休眠）
fn step<L: RobotLink>(link: &mut L, supervisor: &mut Supervisor) -> Result<(), ControlError> {
    let snapshot = read_snapshot(link)?;
    let command = supervisor.execute(&snapshot);
    let pwm = command.to_pwm();

    debug!(
        "{:7} {:7} {:7} {:7} {:7} [{}] ir={:?}",
        snapshot.skew(),
        snapshot.left_ticks,
        snapshot.right_ticks,
        pwm.left,
        pwm.right,
        supervisor.active(),
        snapshot.ir
    );

    link.command_power(pwm)?;
    Ok(())
}
