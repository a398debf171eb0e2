//! 控制层数据类型

use qbot_protocol::{IR_SENSOR_COUNT, Pwm};
use std::fmt;

/// 正前方红外传感器在读数数组中的下标
pub const FRONT_IR_INDEX: usize = 2;

/// 单个控制周期的传感器快照
///
/// 每周期重新读取，控制器只读不写。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    /// 左轮编码器计数
    pub left_ticks: i64,
    /// 右轮编码器计数
    pub right_ticks: i64,
    /// 5 路红外距离值
    pub ir: [f64; IR_SENSOR_COUNT],
}

impl SensorSnapshot {
    pub fn new(left_ticks: i64, right_ticks: i64, ir: [f64; IR_SENSOR_COUNT]) -> Self {
        Self {
            left_ticks,
            right_ticks,
            ir,
        }
    }

    /// 从协议应答构造（编码器应答是浮点数，四舍五入为整数计数）
    pub fn from_readings(encoders: (f64, f64), ir: [f64; IR_SENSOR_COUNT]) -> Self {
        Self::new(encoders.0.round() as i64, encoders.1.round() as i64, ir)
    }

    /// 正前方红外读数
    pub fn front_ir(&self) -> f64 {
        self.ir[FRONT_IR_INDEX]
    }

    /// 右轮减左轮的计数差
    ///
    /// 编码器计数可能回绕，差值按补码回绕计算。
    pub fn skew(&self) -> i64 {
        self.right_ticks.wrapping_sub(self.left_ticks)
    }
}

/// 控制器输出的电机功率对（未钳位）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorCommand {
    pub left: f64,
    pub right: f64,
}

impl MotorCommand {
    /// 停止
    pub const STOP: MotorCommand = MotorCommand {
        left: 0.0,
        right: 0.0,
    };

    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// 钳位到 `[-100, 100]` 并截断为整数功率
    pub fn to_pwm(self) -> Pwm {
        Pwm::from_output(self.left, self.right)
    }

    pub fn is_stop(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

impl fmt::Display for MotorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.left, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_readings_rounds_ticks() {
        let s = SensorSnapshot::from_readings((10.4, 11.6), [0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.left_ticks, 10);
        assert_eq!(s.right_ticks, 12);
        assert_eq!(s.skew(), 2);
        assert_eq!(s.front_ir(), 2.0);
    }

    #[test]
    fn test_skew_of_saturated_ticks_wraps() {
        // 超出 i64 范围的应答在转换时饱和到 i64::MIN / i64::MAX
        let s = SensorSnapshot::from_readings((-1e23, 1e23), [0.0; IR_SENSOR_COUNT]);
        assert_eq!(s.left_ticks, i64::MIN);
        assert_eq!(s.right_ticks, i64::MAX);
        assert_eq!(s.skew(), -1);
    }

    #[test]
    fn test_motor_command_to_pwm() {
        assert_eq!(MotorCommand::new(130.2, -12.7).to_pwm(), Pwm::new(100, -12));
        assert!(MotorCommand::STOP.to_pwm().is_stop());
        assert!(MotorCommand::STOP.is_stop());
    }
}
