//! 寻找新方向控制器
//!
//! 原地按固定方向旋转，寻找正前方没有障碍的方向。每一轮：
//!
//! - 周期 1..=9：正前方红外读数低于阈值时发出 `NoObstacle` 并输出 (0, 0)，否则继续旋转
//! - 周期 10..=13：继续旋转，不看传感器
//! - 周期 > 13：计数归零，停顿一个周期，然后开始下一轮

use super::{BehaviorEvent, Step};
use crate::types::{MotorCommand, SensorSnapshot};
use serde::{Deserialize, Serialize};

/// 正前方红外读数低于此值视为空旷
pub const CLEARANCE_THRESHOLD: f64 = 50.0;

/// 读取传感器的最后一个周期
const SENSE_CYCLES: u32 = 9;

/// 一轮旋转的最后一个周期
const BURST_CYCLES: u32 = 13;

/// 旋转功率
const ROTATE_POWER: f64 = 85.0;

/// 旋转方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// 左转：左轮后退、右轮前进
    #[default]
    Left,
    /// 右转：左轮前进、右轮后退
    Right,
}

impl Rotation {
    fn command(self) -> MotorCommand {
        match self {
            Rotation::Left => MotorCommand::new(-ROTATE_POWER, ROTATE_POWER),
            Rotation::Right => MotorCommand::new(ROTATE_POWER, -ROTATE_POWER),
        }
    }
}

/// 寻找新方向控制器
#[derive(Debug, Clone, Default)]
pub struct SearchController {
    cycle: u32,
    rotation: Rotation,
}

impl SearchController {
    pub fn new(rotation: Rotation) -> Self {
        Self { cycle: 0, rotation }
    }

    pub fn execute(&mut self, snapshot: &SensorSnapshot) -> Step {
        self.cycle += 1;

        if self.cycle > BURST_CYCLES {
            self.cycle = 0;
            return Step::command(MotorCommand::STOP);
        }

        if self.cycle <= SENSE_CYCLES && snapshot.front_ir() < CLEARANCE_THRESHOLD {
            return Step::with_event(MotorCommand::STOP, BehaviorEvent::NoObstacle);
        }

        Step::command(self.rotation.command())
    }

    pub fn reset(&mut self) {
        self.cycle = 0;
    }

    /// 当前一轮中的周期数
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}
