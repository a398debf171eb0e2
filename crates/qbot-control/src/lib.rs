//! # QuickBot Control
//!
//! 行为监督器与反馈控制器。
//!
//! - `pid`: 离散 PID 控制器
//! - `controllers`: 直线行驶 / 避障倒车 / 寻找方向 三个控制器
//! - `supervisor`: 行为状态机，按控制器事件切换
//! - `loop_runner`: 固定周期的读取-决策-下发循环
//! - `routines`: 直线调参、功率爬升、红外采样等独立例程
//! - `signal`: 简单的同步事件广播
//!
//! 控制逻辑只依赖 [`qbot_driver::RobotLink`]，不直接接触 socket。
//!
//! # 使用示例
//!
//! ```no_run
//! use qbot_control::{BehaviorConfig, Supervisor, run_behavior};
//! use qbot_driver::{LinkConfig, QbMaster};
//! use std::sync::atomic::AtomicBool;
//!
//! # fn main() -> Result<(), qbot_control::ControlError> {
//! let link = LinkConfig::new(
//!     "192.168.0.5:5005".parse().unwrap(),
//!     "192.168.0.6:5005".parse().unwrap(),
//! );
//! let behavior = BehaviorConfig::default();
//! let stop = AtomicBool::new(false);
//!
//! let report = QbMaster::connect(&link, |master| -> Result<_, qbot_control::ControlError> {
//!     master.reset()?;
//!     let mut supervisor = Supervisor::from_config(&behavior);
//!     run_behavior(master, &mut supervisor, &behavior.loop_config(), &stop)
//! })?;
//! println!("{} cycles, ended in {}", report.cycles, report.behavior);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controllers;
mod error;
pub mod loop_runner;
mod pid;
pub mod routines;
mod signal;
pub mod supervisor;
mod types;

pub use config::{BehaviorConfig, DriveConfig, LoopConfig, SearchConfig, StraightConfig};
pub use controllers::{
    AvoidController, BehaviorEvent, DriveController, Rotation, SearchController, Step,
};
pub use error::ControlError;
pub use loop_runner::{LoopReport, read_snapshot, run_behavior};
pub use pid::{Gains, Pid};
pub use routines::{StraightSample, collect_ir_samples, ramp, ramp_values, run_straight};
pub use signal::{Signal, SubscriptionId};
pub use supervisor::{Behavior, Supervisor, Transition};
pub use types::{FRONT_IR_INDEX, MotorCommand, SensorSnapshot};
