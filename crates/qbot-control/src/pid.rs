//! PID Controller - 比例-积分-微分控制器
//!
//! 以"每周期一次"的离散形式工作，不使用 `dt`：
//!
//! ```text
//! integral += e
//! output    = Kp * e + Ki * integral + Kd * (e - e_prev)
//! ```
//!
//! - 第一次调用时没有上一次误差，微分项为 0
//! - 积分项不做饱和限制，输出钳位由调用方负责
//!
//! # 示例
//!
//! ```rust
//! use qbot_control::Pid;
//!
//! let mut pid = Pid::new(0.5, 0.01, 0.05);
//! let delta = pid.feed(4.0);
//! assert!((delta - (0.5 * 4.0 + 0.01 * 4.0)).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// PID 增益
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    /// 比例增益 (Kp)
    pub kp: f64,
    /// 积分增益 (Ki)
    pub ki: f64,
    /// 微分增益 (Kd)
    pub kd: f64,
}

impl Gains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// PID 控制器
///
/// 增益在构造时固定；内部状态只在 [`Pid::feed`] 中更新。
#[derive(Debug, Clone, PartialEq)]
pub struct Pid {
    gains: Gains,

    /// 误差累积值（无上限）
    integral: f64,

    /// 上一次的误差，首次调用前为 `None`
    last_error: Option<f64>,
}

impl Pid {
    /// 创建新的 PID 控制器
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self::from_gains(Gains::new(kp, ki, kd))
    }

    /// 从增益结构创建
    pub fn from_gains(gains: Gains) -> Self {
        Self {
            gains,
            integral: 0.0,
            last_error: None,
        }
    }

    /// 输入一个误差，返回控制输出
    pub fn feed(&mut self, error: f64) -> f64 {
        self.integral += error;

        let mut output = self.gains.kp * error + self.gains.ki * self.integral;
        if let Some(last) = self.last_error {
            output += self.gains.kd * (error - last);
        }
        self.last_error = Some(error);

        output
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    /// 当前积分项（用于调试和监控）
    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn last_error(&self) -> Option<f64> {
        self.last_error
    }
}
