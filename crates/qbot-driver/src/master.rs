//! QuickBot 协议客户端
//!
//! 把高层命令翻译为 UDP 数据报，并把应答解析为数值。
//!
//! # 时序
//!
//! 全同步：同一时刻最多只有一个请求在等待应答。请求/应答命令发送后阻塞在
//! `recv_from` 上，超过 `LinkConfig::timeout()` 没有应答时返回
//! [`DriverError::Timeout`]，不做自动重试。来自其它地址的数据报被丢弃，
//! 在同一截止时间内继续等待。

use crate::config::LinkConfig;
use crate::error::DriverError;
use crate::link::RobotLink;
use qbot_protocol::{
    Command, IR_SENSOR_COUNT, ProtocolError, Pwm, RECV_BUFFER_SIZE, is_handshake,
    parse_ir_values, parse_pair,
};
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// QuickBot 协议客户端
///
/// 持有绑定到 `base_addr` 的 UDP socket。socket 随 `QbMaster` 一起释放；
/// 推荐通过 [`QbMaster::connect`] 在作用域内使用。
#[derive(Debug)]
pub struct QbMaster {
    socket: UdpSocket,
    robot_addr: SocketAddr,
    timeout: Duration,
}

impl QbMaster {
    /// 绑定本地地址并设置接收超时
    pub fn open(config: &LinkConfig) -> Result<Self, DriverError> {
        config.validate()?;

        let socket = UdpSocket::bind(config.base_addr)?;
        socket.set_read_timeout(Some(config.timeout()))?;

        let local = socket.local_addr()?;
        debug!(
            "QuickBot link opened: local {} -> robot {} (timeout {:?})",
            local,
            config.robot_addr,
            config.timeout()
        );

        Ok(Self {
            socket,
            robot_addr: config.robot_addr,
            timeout: config.timeout(),
        })
    }

    /// 在连接作用域内执行 `f`
    ///
    /// 进入作用域时绑定 socket，退出时无条件关闭（包括 `f` 返回错误）。
    ///
    /// ```no_run
    /// use qbot_driver::{LinkConfig, QbMaster, DriverError};
    ///
    /// # let config = LinkConfig::new("127.0.0.1:5005".parse().unwrap(), "127.0.0.1:5006".parse().unwrap());
    /// let alive = QbMaster::connect(&config, |master| master.check())?;
    /// # Ok::<(), DriverError>(())
    /// ```
    pub fn connect<T, E, F>(config: &LinkConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut QbMaster) -> Result<T, E>,
        E: From<DriverError>,
    {
        let mut master = QbMaster::open(config)?;
        let result = f(&mut master);
        master.close();
        result
    }

    /// 关闭 socket
    pub fn close(self) {
        debug!("QuickBot link to {} closed", self.robot_addr);
    }

    /// 本地绑定地址
    pub fn local_addr(&self) -> Result<SocketAddr, DriverError> {
        Ok(self.socket.local_addr()?)
    }

    /// 机器人地址
    pub fn robot_addr(&self) -> SocketAddr {
        self.robot_addr
    }

    /// 发送一帧（不等待应答）
    fn send(&self, command: Command) -> Result<(), DriverError> {
        trace!("-> {}", command);
        self.socket.send_to(command.encode().as_bytes(), self.robot_addr)?;
        Ok(())
    }

    /// 发送一帧并等待一个应答
    fn request(&self, command: Command) -> Result<String, DriverError> {
        self.send(command)?;

        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let len = self.recv_from_robot(&mut buf, command)?;

        let reply = std::str::from_utf8(&buf[..len])
            .map_err(|_| ProtocolError::InvalidUtf8 { len })?
            .to_string();
        trace!("<- {:?}", reply);
        Ok(reply)
    }

    /// 接收一个来自机器人的数据报，总等待时间不超过 `timeout`
    fn recv_from_robot(&self, buf: &mut [u8], command: Command) -> Result<usize, DriverError> {
        let deadline = Instant::now() + self.timeout;
        let mut shortened = false;
        let result = loop {
            let (len, from) = match self.socket.recv_from(buf) {
                Ok(received) => received,
                Err(e) => break Err(e),
            };
            if from == self.robot_addr {
                break Ok(len);
            }

            warn!("Dropping datagram from unexpected peer {} while waiting for {}", from, command);
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break Err(io::ErrorKind::TimedOut.into());
            }
            shortened = true;
            if let Err(e) = self.socket.set_read_timeout(Some(remaining)) {
                break Err(e);
            }
        };

        if shortened {
            self.socket.set_read_timeout(Some(self.timeout))?;
        }

        result.map_err(|e| match e.kind() {
            // Unix 上读超时表现为 WouldBlock，Windows 上为 TimedOut
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => DriverError::Timeout,
            _ => DriverError::Io(e),
        })
    }

    /// `$RESET*`：复位机器人端状态（不等待应答）
    pub fn reset(&self) -> Result<(), DriverError> {
        self.send(Command::Reset)
    }

    /// `$CHECK*`：握手检查
    ///
    /// 应答以握手字符串开头时返回 `Ok(true)`；应答内容不符时返回 `Ok(false)`，
    /// 由调用方决定是否中止。超时仍然返回错误。
    pub fn check(&self) -> Result<bool, DriverError> {
        let reply = self.request(Command::Check)?;
        debug!("Check reply: {:?}", reply);

        let ok = is_handshake(&reply);
        if !ok {
            warn!("Unexpected handshake reply from {}: {:?}", self.robot_addr, reply);
        }
        Ok(ok)
    }

    /// `$PWM=<L>,<R>*`：设置电机功率（不等待应答）
    pub fn set_power(&self, left: i32, right: i32) -> Result<(), DriverError> {
        self.send(Command::SetPwm(Pwm::new(left, right)))
    }

    /// `$PWM?*`：读取当前电机功率
    pub fn get_power(&self) -> Result<(f64, f64), DriverError> {
        Ok(parse_pair(&self.request(Command::GetPwm)?)?)
    }

    /// `$ENVAL?*`：读取编码器计数
    pub fn get_envalues(&self) -> Result<(f64, f64), DriverError> {
        Ok(parse_pair(&self.request(Command::GetEnVal)?)?)
    }

    /// `$ENVEL?*`：读取编码器包络值
    pub fn get_envelope(&self) -> Result<(f64, f64), DriverError> {
        Ok(parse_pair(&self.request(Command::GetEnVel)?)?)
    }

    /// `$IRVAL?*`：读取 5 路红外距离值
    pub fn get_ir_values(&self) -> Result<[f64; IR_SENSOR_COUNT], DriverError> {
        Ok(parse_ir_values(&self.request(Command::GetIrVal)?)?)
    }
}

impl RobotLink for QbMaster {
    fn command_power(&mut self, pwm: Pwm) -> Result<(), DriverError> {
        QbMaster::set_power(self, pwm.left, pwm.right)
    }

    fn read_encoders(&mut self) -> Result<(f64, f64), DriverError> {
        self.get_envalues()
    }

    fn read_ir(&mut self) -> Result<[f64; IR_SENSOR_COUNT], DriverError> {
        self.get_ir_values()
    }
}
