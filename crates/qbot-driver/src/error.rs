//! 驱动层错误类型定义

use qbot_protocol::ProtocolError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// Socket IO 错误（绑定失败、发送失败等）
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 在接收超时内没有收到应答
    #[error("Operation timeout")]
    Timeout,

    /// 应答解析失败
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 握手失败（`$CHECK*` 应答不符合预期）
    ///
    /// `QbMaster::check()` 本身返回 `Ok(false)`，由调用方决定是否转为此错误。
    #[error("Handshake failed: robot did not answer the check request")]
    Handshake,

    /// 配置无效
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DriverError {
    /// 是否为传输超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout)
    }
}
