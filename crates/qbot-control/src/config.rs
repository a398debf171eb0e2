//! 控制参数配置
//!
//! 所有字段都有默认值，TOML 中只需写出要覆盖的部分：
//!
//! ```toml
//! cycles = 1500
//! period_ms = 50
//!
//! [drive]
//! kp = 1.0
//! ki = 0.03
//! kd = 0.0
//! power = 70.0
//!
//! [search]
//! rotation = "left"
//! ```

use crate::controllers::Rotation;
use crate::error::ControlError;
use crate::pid::Gains;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 行为监督器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// 控制周期数
    pub cycles: usize,

    /// 控制周期（毫秒）
    pub period_ms: u64,

    pub drive: DriveConfig,

    pub search: SearchConfig,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            cycles: 1500,
            period_ms: 50,
            drive: DriveConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl BehaviorConfig {
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            period: Duration::from_millis(self.period_ms),
            max_cycles: Some(self.cycles),
        }
    }
}

/// 直线行驶控制器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// 基础功率
    pub power: f64,

    /// 首次激活使用的目标计数差（右轮 - 左轮）
    ///
    /// 不设置时首次激活也在第一个周期记录当时的计数差。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<i64>,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.03,
            kd: 0.0,
            power: 70.0,
            turn: None,
        }
    }
}

impl DriveConfig {
    pub fn gains(&self) -> Gains {
        Gains::new(self.kp, self.ki, self.kd)
    }
}

/// 寻找方向控制器配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub rotation: Rotation,
}

/// 直线行驶调参例程配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StraightConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub power: f64,

    /// 目标计数差（右轮 - 左轮），非 0 时先转向再直行
    pub turn: i64,

    pub cycles: usize,
    pub period_ms: u64,

    /// 停止后继续采样的次数
    pub coast_samples: usize,
    pub coast_period_ms: u64,
}

impl Default for StraightConfig {
    fn default() -> Self {
        Self {
            kp: 0.5,
            ki: 0.01,
            kd: 0.05,
            power: 60.0,
            turn: 0,
            cycles: 150,
            period_ms: 5,
            coast_samples: 10,
            coast_period_ms: 50,
        }
    }
}

impl StraightConfig {
    pub fn gains(&self) -> Gains {
        Gains::new(self.kp, self.ki, self.kd)
    }
}

/// 控制循环配置
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// 周期间隔
    pub period: Duration,

    /// 最大周期数（None 表示一直运行到被停止）
    pub max_cycles: Option<usize>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        BehaviorConfig::default().loop_config()
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), ControlError> {
        if self.period.is_zero() {
            return Err(ControlError::Config("period must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_defaults() {
        let config = BehaviorConfig::default();
        assert_eq!(config.cycles, 1500);
        assert_eq!(config.period_ms, 50);
        assert_eq!(config.drive.gains(), Gains::new(1.0, 0.03, 0.0));
        assert_eq!(config.drive.power, 70.0);
        assert_eq!(config.search.rotation, Rotation::Left);
        assert_eq!(config.drive.turn, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: BehaviorConfig = toml::from_str(
            r#"
period_ms = 20

[drive]
power = 55.0
turn = -15

[search]
rotation = "right"
"#,
        )
        .unwrap();
        assert_eq!(config.cycles, 1500);
        assert_eq!(config.period_ms, 20);
        assert_eq!(config.drive.power, 55.0);
        assert_eq!(config.drive.kp, 1.0);
        assert_eq!(config.drive.turn, Some(-15));
        assert_eq!(config.search.rotation, Rotation::Right);
    }

    #[test]
    fn test_loop_config_from_behavior() {
        let config = BehaviorConfig {
            cycles: 10,
            period_ms: 5,
            ..Default::default()
        };
        let loop_config = config.loop_config();
        assert_eq!(loop_config.period, Duration::from_millis(5));
        assert_eq!(loop_config.max_cycles, Some(10));
        assert!(loop_config.validate().is_ok());
    }

    #[test]
    fn test_loop_config_rejects_zero_period() {
        let config = LoopConfig {
            period: Duration::ZERO,
            max_cycles: None,
        };
        assert!(matches!(config.validate(), Err(ControlError::Config(_))));
    }

    #[test]
    fn test_straight_defaults() {
        let config = StraightConfig::default();
        assert_eq!(config.gains(), Gains::new(0.5, 0.01, 0.05));
        assert_eq!(config.power, 60.0);
        assert_eq!(config.cycles, 150);
    }
}
