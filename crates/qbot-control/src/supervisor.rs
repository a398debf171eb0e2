//! 行为监督器 - 状态机
//!
//! 持有三个控制器，每个周期只执行当前激活的那一个，并根据它返回的事件切换：
//!
//! ```text
//!            Obstacle (reset Avoid)
//!   Drive ─────────────────────────> Avoid
//!     ^                                │
//!     │ NoObstacle (reset Drive)       │ Backtracked (不 reset Search)
//!     │                                v
//!     └──────────────────────────── Search
//! ```
//!
//! ⚠️ Avoid -> Search 时**不**重置寻找方向控制器：它从上一次离开时的周期
//! 计数继续（首次使用时为构造时的 0）。
//!
//! 每次切换都会在 [`Supervisor::transitions`] 上广播一个 [`Transition`]。

use crate::config::BehaviorConfig;
use crate::controllers::{
    AvoidController, BehaviorEvent, DriveController, SearchController, Step,
};
use crate::signal::Signal;
use crate::types::{MotorCommand, SensorSnapshot};
use std::fmt;
use tracing::{info, warn};

/// 当前激活的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Behavior {
    #[default]
    Drive,
    Avoid,
    Search,
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Behavior::Drive => "DRIVE",
            Behavior::Avoid => "AVOID",
            Behavior::Search => "SEARCH",
        };
        f.write_str(name)
    }
}

/// 一次状态切换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Behavior,
    pub to: Behavior,
    pub event: BehaviorEvent,
}

/// 行为监督器
#[derive(Debug)]
pub struct Supervisor {
    drive: DriveController,
    avoid: AvoidController,
    search: SearchController,
    active: Behavior,
    transitions: Signal<Transition>,
}

impl Supervisor {
    pub fn new(drive: DriveController, avoid: AvoidController, search: SearchController) -> Self {
        Self {
            drive,
            avoid,
            search,
            active: Behavior::Drive,
            transitions: Signal::new(),
        }
    }

    pub fn from_config(config: &BehaviorConfig) -> Self {
        Self::new(
            DriveController::from_config(&config.drive),
            AvoidController::new(),
            SearchController::new(config.search.rotation),
        )
    }

    /// 执行一个控制周期
    ///
    /// 返回的功率未钳位。若激活的控制器发出事件，返回前已完成切换，
    /// 下一次调用将执行新的控制器。
    pub fn execute(&mut self, snapshot: &SensorSnapshot) -> MotorCommand {
        let Step { command, event } = match self.active {
            Behavior::Drive => self.drive.execute(snapshot),
            Behavior::Avoid => self.avoid.execute(snapshot),
            Behavior::Search => self.search.execute(snapshot),
        };

        if let Some(event) = event {
            self.on_event(event);
        }

        command
    }

    fn on_event(&mut self, event: BehaviorEvent) {
        let from = self.active;
        let to = match (from, event) {
            (Behavior::Drive, BehaviorEvent::Obstacle) => {
                self.avoid.reset();
                Behavior::Avoid
            },
            (Behavior::Avoid, BehaviorEvent::Backtracked) => Behavior::Search,
            (Behavior::Search, BehaviorEvent::NoObstacle) => {
                self.drive.reset();
                Behavior::Drive
            },
            _ => {
                // 控制器只会发出自己的事件，正常情况下不会到达这里
                warn!("Ignoring {} event while {} is active", event, from);
                return;
            },
        };

        self.active = to;
        info!("{} -> {} on {}", from, to, event);
        self.transitions.emit(&Transition { from, to, event });
    }

    /// 当前激活的行为
    pub fn active(&self) -> Behavior {
        self.active
    }

    /// 状态切换广播，用于订阅/取消订阅
    pub fn transitions(&mut self) -> &mut Signal<Transition> {
        &mut self.transitions
    }

    pub fn drive(&self) -> &DriveController {
        &self.drive
    }

    pub fn avoid(&self) -> &AvoidController {
        &self.avoid
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::from_config(&BehaviorConfig::default())
    }
}
