//! 应答解析
//!
//! 数值应答的语法：
//!
//! ```text
//! reply  := '[' number (ws* ',' ws* number)* ']' ws*
//! number := '-'? [0-9.]+
//! ```
//!
//! 不匹配的应答一律返回 [`ProtocolError::UnexpectedReply`]，并附带原始文本。

use crate::ProtocolError;
use crate::constants::{HANDSHAKE_LITERAL, IR_SENSOR_COUNT};

/// 判断 `$CHECK*` 应答是否为合法握手
pub fn is_handshake(reply: &str) -> bool {
    reply.starts_with(HANDSHAKE_LITERAL)
}

/// 解析方括号内逗号分隔的数值列表
///
/// ```rust
/// use qbot_protocol::parse_values;
///
/// assert_eq!(parse_values("[1, -2.5, 3]").unwrap(), vec![1.0, -2.5, 3.0]);
/// assert!(parse_values("1, 2").is_err());
/// ```
pub fn parse_values(reply: &str) -> Result<Vec<f64>, ProtocolError> {
    let unexpected = || ProtocolError::UnexpectedReply {
        reply: reply.to_string(),
    };

    let inner = reply
        .trim_end()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(unexpected)?;

    let tokens: Vec<&str> = inner.split(',').collect();
    let last = tokens.len() - 1;

    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            // 空白只允许出现在逗号两侧，不允许紧跟 '[' 或紧贴 ']'
            let mut token = *token;
            if index > 0 {
                token = token.trim_start();
            }
            if index < last {
                token = token.trim_end();
            }
            parse_number(token).ok_or_else(unexpected)
        })
        .collect()
}

/// 解析二元组应答，如 `[1.5, -2.0]`
///
/// ```rust
/// use qbot_protocol::parse_pair;
///
/// assert_eq!(parse_pair("[1.5, -2.0]").unwrap(), (1.5, -2.0));
/// ```
pub fn parse_pair(reply: &str) -> Result<(f64, f64), ProtocolError> {
    match parse_values(reply)?.as_slice() {
        [a, b] => Ok((*a, *b)),
        values => Err(ProtocolError::WrongArity {
            expected: 2,
            actual: values.len(),
            reply: reply.to_string(),
        }),
    }
}

/// 解析红外距离应答（5 个数值）
pub fn parse_ir_values(reply: &str) -> Result<[f64; IR_SENSOR_COUNT], ProtocolError> {
    let values = parse_values(reply)?;
    let actual = values.len();
    values.try_into().map_err(|_| ProtocolError::WrongArity {
        expected: IR_SENSOR_COUNT,
        actual,
        reply: reply.to_string(),
    })
}

/// `-?[0-9.]+`，并且必须是合法的浮点数
fn parse_number(token: &str) -> Option<f64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    token.parse().ok()
}
