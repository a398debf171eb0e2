//! 机器人链路抽象
//!
//! 控制循环只依赖 [`RobotLink`]，真实硬件由 [`QbMaster`](crate::QbMaster) 实现，
//! 测试中可以用内存中的模拟实现替换。

use crate::error::DriverError;
use qbot_protocol::{IR_SENSOR_COUNT, Pwm};

/// 控制循环所需的最小机器人接口
pub trait RobotLink {
    /// 下发电机功率
    fn command_power(&mut self, pwm: Pwm) -> Result<(), DriverError>;

    /// 读取左右轮编码器计数
    fn read_encoders(&mut self) -> Result<(f64, f64), DriverError>;

    /// 读取 5 路红外距离值
    fn read_ir(&mut self) -> Result<[f64; IR_SENSOR_COUNT], DriverError>;

    /// 停止两轮
    fn stop(&mut self) -> Result<(), DriverError> {
        self.command_power(Pwm::STOP)
    }
}

impl<L: RobotLink + ?Sized> RobotLink for &mut L {
    fn command_power(&mut self, pwm: Pwm) -> Result<(), DriverError> {
        (**self).command_power(pwm)
    }

    fn read_encoders(&mut self) -> Result<(f64, f64), DriverError> {
        (**self).read_encoders()
    }

    fn read_ir(&mut self) -> Result<[f64; IR_SENSOR_COUNT], DriverError> {
        (**self).read_ir()
    }
}
