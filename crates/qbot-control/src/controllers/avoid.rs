//! 避障回退控制器
//!
//! 测量机器人在停止命令后因惯性多走的距离，然后倒车补偿。
//!
//! ```text
//! 周期 1      记录两轮计数作为停止位置，输出 (0, 0)
//! 周期 2..9   继续输出 (0, 0)，等待惯性消散
//! 周期 10     overshoot = 当前计数 - 停止位置；target = 当前计数 + overshoot
//! 周期 >= 10  每个轮子独立：计数 < target 时 -70，否则 0
//!             两轮都为 0 时发出 Backtracked
//! ```

use super::{BehaviorEvent, Step};
use crate::types::{MotorCommand, SensorSnapshot};
use tracing::debug;

/// 开始倒车的周期
const BACKTRACK_CYCLE: u32 = 10;

/// 倒车功率
const REVERSE_POWER: f64 = -70.0;

/// 避障回退控制器
#[derive(Debug, Clone, Default)]
pub struct AvoidController {
    cycle: u32,

    /// 周期 1 时为停止位置，周期 10 起为倒车目标
    left_mark: i64,
    right_mark: i64,

    /// 本次激活已发出 Backtracked
    finished: bool,
}

impl AvoidController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute(&mut self, snapshot: &SensorSnapshot) -> Step {
        self.cycle = self.cycle.saturating_add(1);

        if self.cycle == 1 {
            self.left_mark = snapshot.left_ticks;
            self.right_mark = snapshot.right_ticks;
        }

        if self.cycle < BACKTRACK_CYCLE {
            return Step::command(MotorCommand::STOP);
        }

        if self.cycle == BACKTRACK_CYCLE {
            // 计数可能回绕，全部按补码回绕运算
            let left_overshoot = snapshot.left_ticks.wrapping_sub(self.left_mark);
            let right_overshoot = snapshot.right_ticks.wrapping_sub(self.right_mark);
            debug!("Overshot by: {} {}", left_overshoot, right_overshoot);

            self.left_mark = snapshot.left_ticks.wrapping_add(left_overshoot);
            self.right_mark = snapshot.right_ticks.wrapping_add(right_overshoot);
        }

        if self.finished {
            return Step::command(MotorCommand::STOP);
        }

        let left = if snapshot.left_ticks < self.left_mark { REVERSE_POWER } else { 0.0 };
        let right = if snapshot.right_ticks < self.right_mark { REVERSE_POWER } else { 0.0 };

        if left == 0.0 && right == 0.0 {
            self.finished = true;
            return Step::with_event(MotorCommand::STOP, BehaviorEvent::Backtracked);
        }

        Step::command(MotorCommand::new(left, right))
    }

    /// 重新激活：从周期 1 重新开始
    pub fn reset(&mut self) {
        self.cycle = 0;
        self.finished = false;
    }

    /// 倒车目标（周期 10 之后有效）
    pub fn target(&self) -> (i64, i64) {
        (self.left_mark, self.right_mark)
    }
}
