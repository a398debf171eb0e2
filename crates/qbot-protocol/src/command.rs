//! 命令帧构建
//!
//! 把高层命令编码为 ASCII 帧。命令分为两类：
//!
//! - **仅发送**（fire-and-forget）：`Reset`、`SetPwm`
//! - **请求/应答**：其余命令，每个请求恰好对应一个应答

use crate::constants::{FRAME_END, FRAME_START, PWM_MAX, PWM_MIN};
use std::fmt;

/// 一对电机功率（左轮、右轮），已钳位到 `[-100, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pwm {
    pub left: i32,
    pub right: i32,
}

impl Pwm {
    /// 停止（两轮功率为 0）
    pub const STOP: Pwm = Pwm { left: 0, right: 0 };

    /// 创建功率对，超出范围的值被钳位
    pub fn new(left: i32, right: i32) -> Self {
        Self {
            left: left.clamp(PWM_MIN, PWM_MAX),
            right: right.clamp(PWM_MIN, PWM_MAX),
        }
    }

    /// 从控制器的浮点输出构造
    ///
    /// 先钳位到 `[-100, 100]`，再向零截断取整。NaN 映射为 0。
    pub fn from_output(left: f64, right: f64) -> Self {
        Self {
            left: clamp_output(left),
            right: clamp_output(right),
        }
    }

    /// 是否为停止命令
    pub fn is_stop(&self) -> bool {
        *self == Self::STOP
    }
}

fn clamp_output(value: f64) -> i32 {
    // `as` 对 NaN 返回 0，对有限值向零截断
    value.clamp(PWM_MIN as f64, PWM_MAX as f64) as i32
}

impl fmt::Display for Pwm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.left, self.right)
    }
}

/// QuickBot 命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 复位机器人端状态
    Reset,
    /// 握手检查
    Check,
    /// 设置电机功率
    SetPwm(Pwm),
    /// 读取当前电机功率
    GetPwm,
    /// 读取编码器计数
    GetEnVal,
    /// 读取编码器包络值
    GetEnVel,
    /// 读取红外距离值
    GetIrVal,
}

impl Command {
    /// 帧主体（不含 `$` 和 `*\n`）
    fn body(&self) -> String {
        match self {
            Command::Reset => "RESET".to_string(),
            Command::Check => "CHECK".to_string(),
            Command::SetPwm(pwm) => format!("PWM={},{}", pwm.left, pwm.right),
            Command::GetPwm => "PWM?".to_string(),
            Command::GetEnVal => "ENVAL?".to_string(),
            Command::GetEnVel => "ENVEL?".to_string(),
            Command::GetIrVal => "IRVAL?".to_string(),
        }
    }

    /// 编码为完整的 ASCII 帧
    ///
    /// ```rust
    /// use qbot_protocol::{Command, Pwm};
    ///
    /// assert_eq!(Command::Reset.encode(), "$RESET*\n");
    /// assert_eq!(Command::SetPwm(Pwm::new(60, -40)).encode(), "$PWM=60,-40*\n");
    /// ```
    pub fn encode(&self) -> String {
        format!("{}{}{}", FRAME_START, self.body(), FRAME_END)
    }

    /// 该命令是否期待应答
    pub fn expects_reply(&self) -> bool {
        !matches!(self, Command::Reset | Command::SetPwm(_))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}*", self.body())
    }
}
