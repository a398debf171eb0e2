//! 测试用的内存链路

#![allow(dead_code)]

use qbot_driver::{DriverError, IR_SENSOR_COUNT, Pwm, RobotLink};

/// 按脚本返回传感器读数，并记录所有下发的功率
#[derive(Debug, Default)]
pub struct MockLink {
    /// 第 n 次读取红外时的正前方读数，超出部分重复最后一个值
    pub front_ir: Vec<f64>,
    /// 第 n 次读取编码器时的计数，超出部分重复最后一个值
    pub encoders: Vec<(f64, f64)>,
    /// 第 n 次（从 0 开始）读取红外时返回超时
    pub fail_ir_at: Option<usize>,
    /// 第 n 次（从 0 开始）读取编码器时返回超时
    pub fail_encoders_at: Option<usize>,
    /// 第 n 次（从 0 开始）下发功率时返回超时
    pub fail_command_at: Option<usize>,
    pub commands: Vec<Pwm>,
    pub ir_reads: usize,
    pub encoder_reads: usize,
}

impl MockLink {
    pub fn with_front_ir(front_ir: Vec<f64>) -> Self {
        Self {
            front_ir,
            ..Default::default()
        }
    }
}

fn scripted<T: Copy>(script: &[T], index: usize, fallback: T) -> T {
    script.get(index).or(script.last()).copied().unwrap_or(fallback)
}

impl RobotLink for MockLink {
    fn command_power(&mut self, pwm: Pwm) -> Result<(), DriverError> {
        if self.fail_command_at == Some(self.commands.len()) {
            self.fail_command_at = None;
            return Err(DriverError::Timeout);
        }
        self.commands.push(pwm);
        Ok(())
    }

    fn read_encoders(&mut self) -> Result<(f64, f64), DriverError> {
        if self.fail_encoders_at == Some(self.encoder_reads) {
            return Err(DriverError::Timeout);
        }
        let value = scripted(&self.encoders, self.encoder_reads, (0.0, 0.0));
        self.encoder_reads += 1;
        Ok(value)
    }

    fn read_ir(&mut self) -> Result<[f64; IR_SENSOR_COUNT], DriverError> {
        if self.fail_ir_at == Some(self.ir_reads) {
            return Err(DriverError::Timeout);
        }
        let front = scripted(&self.front_ir, self.ir_reads, 0.0);
        self.ir_reads += 1;
        Ok([0.0, 0.0, front, 0.0, 0.0])
    }
}
