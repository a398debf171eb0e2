//! 行为控制器
//!
//! 三个互相独立的控制策略，输入同一份传感器快照，输出一对电机功率：
//!
//! - [`DriveController`]: PID 保持直线行驶，检测到正前方障碍时发出 `Obstacle`
//! - [`AvoidController`]: 刹车、测量冲过的距离并倒车补偿，完成后发出 `Backtracked`
//! - [`SearchController`]: 原地旋转寻找空旷方向，找到后发出 `NoObstacle`
//!
//! 控制器不持有对监督器的引用；事件作为 [`Step`] 的一部分返回，由
//! [`Supervisor`](crate::Supervisor) 读取后切换状态。

mod avoid;
mod drive;
mod search;

pub use avoid::AvoidController;
pub use drive::DriveController;
pub use search::{Rotation, SearchController};

use crate::types::MotorCommand;
use std::fmt;

/// 控制器发出的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorEvent {
    /// 正前方出现障碍
    Obstacle,
    /// 倒车补偿完成
    Backtracked,
    /// 正前方已无障碍
    NoObstacle,
}

impl fmt::Display for BehaviorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BehaviorEvent::Obstacle => "obstacle",
            BehaviorEvent::Backtracked => "backtracked",
            BehaviorEvent::NoObstacle => "no_obstacle",
        };
        f.write_str(name)
    }
}

/// 控制器单周期的输出
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub command: MotorCommand,
    pub event: Option<BehaviorEvent>,
}

impl Step {
    /// 只有功率输出，没有事件
    pub const fn command(command: MotorCommand) -> Self {
        Self {
            command,
            event: None,
        }
    }

    /// 功率输出并附带一个事件
    pub const fn with_event(command: MotorCommand, event: BehaviorEvent) -> Self {
        Self {
            command,
            event: Some(event),
        }
    }
}
