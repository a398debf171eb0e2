//! 协议常量定义

/// 帧起始符
pub const FRAME_START: char = '$';

/// 帧结束符（含换行）
pub const FRAME_END: &str = "*\n";

/// `$CHECK*` 应答必须以此字符串开头
pub const HANDSHAKE_LITERAL: &str = "Hello from QuickBot";

/// 接收缓冲区大小（字节）
pub const RECV_BUFFER_SIZE: usize = 1024;

/// 红外距离传感器数量
pub const IR_SENSOR_COUNT: usize = 5;

/// 电机功率下限
pub const PWM_MIN: i32 = -100;

/// 电机功率上限
pub const PWM_MAX: i32 = 100;
