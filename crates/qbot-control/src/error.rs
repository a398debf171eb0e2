//! 控制层错误类型定义

use qbot_driver::DriverError;
use thiserror::Error;

/// 控制层错误类型
#[derive(Error, Debug)]
pub enum ControlError {
    /// 链路错误（超时、应答解析失败等）
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(String),
}
