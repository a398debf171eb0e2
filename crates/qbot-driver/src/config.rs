//! 链路配置

use crate::error::DriverError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// 默认接收超时（毫秒）
const DEFAULT_TIMEOUT_MS: u64 = 2000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// 链路配置
///
/// 地址没有内置默认值，必须由调用方显式提供。
///
/// TOML 形式：
///
/// ```toml
/// robot_addr = "192.168.0.5:5005"
/// base_addr = "192.168.0.6:5005"
/// timeout_ms = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// 机器人地址（命令发往此处）
    pub robot_addr: SocketAddr,

    /// 本地绑定地址（应答发回此处）
    pub base_addr: SocketAddr,

    /// 每次请求的接收超时（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl LinkConfig {
    /// 使用默认超时（2 秒）创建配置
    pub fn new(robot_addr: SocketAddr, base_addr: SocketAddr) -> Self {
        Self {
            robot_addr,
            base_addr,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// 设置接收超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// 接收超时
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), DriverError> {
        // 超时为 0 时 set_read_timeout 会报错，这里提前给出明确信息
        if self.timeout_ms == 0 {
            return Err(DriverError::InvalidConfig(
                "timeout_ms must be > 0".to_string(),
            ));
        }
        if self.robot_addr.is_ipv4() != self.base_addr.is_ipv4() {
            return Err(DriverError::InvalidConfig(format!(
                "robot_addr {} and base_addr {} use different address families",
                self.robot_addr, self.base_addr
            )));
        }
        Ok(())
    }
}
