//! # QuickBot Driver
//!
//! QuickBot 的 UDP 命令/应答客户端。
//!
//! - `config`: 链路配置（机器人地址、本地地址、接收超时）
//! - `master`: [`QbMaster`] 协议客户端，负责收发帧和解析应答
//! - `link`: [`RobotLink`] trait，控制循环通过它读取传感器、下发功率
//!
//! # 使用示例
//!
//! ```no_run
//! use qbot_driver::{LinkConfig, QbMaster, DriverError};
//!
//! let config = LinkConfig::new(
//!     "192.168.0.5:5005".parse().unwrap(),
//!     "192.168.0.6:5005".parse().unwrap(),
//! );
//!
//! // socket 在闭包结束时关闭（包括出错返回）
//! let ticks = QbMaster::connect(&config, |master| {
//!     if !master.check()? {
//!         return Err(DriverError::Handshake);
//!     }
//!     master.reset()?;
//!     master.get_envalues()
//! })?;
//! # Ok::<(), DriverError>(())
//! ```

mod config;
mod error;
pub mod link;
mod master;

pub use config::LinkConfig;
pub use error::DriverError;
pub use link::RobotLink;
pub use master::QbMaster;

// 重新导出协议层常用类型
pub use qbot_protocol::{Command, IR_SENSOR_COUNT, ProtocolError, Pwm};
