//! 直线行驶控制器
//!
//! 保持左右轮计数差恒定，使机器人走直线。激活后的第一个周期记录当时的
//! 计数差作为目标（吸收启动时已有的偏差，而不是强行回到正前方）。
//!
//! 用 [`DriveController::with_turn`] 构造时，首次激活直接使用给定的目标
//! （先转向再直行），之后每次 `reset` 恢复为第一个周期记录目标。

use super::{BehaviorEvent, Step};
use crate::config::DriveConfig;
use crate::pid::Pid;
use crate::types::{MotorCommand, SensorSnapshot};
use tracing::debug;

/// 正前方红外读数超过此值视为障碍
pub const OBSTACLE_THRESHOLD: f64 = 100.0;

/// 直线行驶控制器
#[derive(Debug, Clone)]
pub struct DriveController {
    pid: Pid,

    /// 基础功率
    power: f64,

    /// 目标计数差（右轮 - 左轮）
    turn_setpoint: i64,

    /// 激活后的周期计数，0 表示尚未记录目标
    cycle: u32,
}

impl DriveController {
    pub fn new(pid: Pid, power: f64) -> Self {
        Self {
            pid,
            power,
            turn_setpoint: 0,
            cycle: 0,
        }
    }

    /// 首次激活使用固定目标计数差，不在第一个周期记录
    pub fn with_turn(pid: Pid, power: f64, turn: i64) -> Self {
        Self {
            pid,
            power,
            turn_setpoint: turn,
            // 视为已过第一个周期
            cycle: 1,
        }
    }

    pub fn from_config(config: &DriveConfig) -> Self {
        let pid = Pid::from_gains(config.gains());
        match config.turn {
            Some(turn) => Self::with_turn(pid, config.power, turn),
            None => Self::new(pid, config.power),
        }
    }

    pub fn execute(&mut self, snapshot: &SensorSnapshot) -> Step {
        self.cycle = self.cycle.saturating_add(1);

        let skew = snapshot.skew();
        if self.cycle == 1 {
            self.turn_setpoint = skew;
            debug!("Drive setpoint captured: right - left = {}", skew);
        }

        if snapshot.front_ir() > OBSTACLE_THRESHOLD {
            debug!("Head-on obstacle, front IR = {:.1}", snapshot.front_ir());
            return Step::with_event(MotorCommand::STOP, BehaviorEvent::Obstacle);
        }

        let delta = self.pid.feed(skew.wrapping_sub(self.turn_setpoint) as f64);
        Step::command(MotorCommand::new(self.power + delta, self.power - delta))
    }

    /// 重新激活：下一个周期重新记录目标计数差
    ///
    /// PID 的积分和上一次误差保留。
    pub fn reset(&mut self) {
        self.cycle = 0;
    }

    pub fn turn_setpoint(&self) -> i64 {
        self.turn_setpoint
    }

    pub fn pid(&self) -> &Pid {
        &self.pid
    }
}

impl Default for DriveController {
    fn default() -> Self {
        Self::from_config(&DriveConfig::default())
    }
}
