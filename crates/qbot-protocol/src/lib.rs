//! # QuickBot Protocol
//!
//! QuickBot 文本命令协议定义（无 IO 依赖）
//!
//! ## 模块
//!
//! - `constants`: 协议常量（帧分隔符、握手字符串、缓冲区大小）
//! - `command`: 命令帧构建
//! - `reply`: 应答解析
//!
//! ## 帧格式
//!
//! 每个 UDP 数据报承载一帧，格式为 `$<BODY>*\n`：
//!
//! ```text
//! $RESET*\n          仅发送
//! $CHECK*\n          请求 -> "Hello from QuickBot..."
//! $PWM=<L>,<R>*\n    仅发送
//! $PWM?*\n           请求 -> [<f>, <f>]
//! $ENVAL?*\n         请求 -> [<f>, <f>]
//! $ENVEL?*\n         请求 -> [<f>, <f>]
//! $IRVAL?*\n         请求 -> [<f>, <f>, <f>, <f>, <f>]
//! ```

pub mod command;
pub mod constants;
pub mod reply;

// 重新导出常用类型
pub use command::{Command, Pwm};
pub use constants::*;
pub use reply::{is_handshake, parse_ir_values, parse_pair, parse_values};

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// 应答不符合 `[<num>, <num>, ...]` 语法
    #[error("Unexpected reply: {reply:?}")]
    UnexpectedReply { reply: String },

    /// 应答语法正确，但数值个数不符
    #[error("Expected {expected} values, got {actual} in reply {reply:?}")]
    WrongArity {
        expected: usize,
        actual: usize,
        reply: String,
    },

    /// 应答不是合法的 UTF-8 文本
    #[error("Reply is not valid UTF-8 ({len} bytes)")]
    InvalidUtf8 { len: usize },
}

impl ProtocolError {
    /// 返回导致错误的原始应答文本（若有）
    pub fn reply(&self) -> Option<&str> {
        match self {
            ProtocolError::UnexpectedReply { reply } | ProtocolError::WrongArity { reply, .. } => {
                Some(reply)
            },
            ProtocolError::InvalidUtf8 { .. } => None,
        }
    }
}
