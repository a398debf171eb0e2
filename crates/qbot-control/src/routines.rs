//! 调参与标定例程
//!
//! 这些例程只是协议客户端的调用方，不经过行为监督器：
//!
//! - [`run_straight`]: 只用 PID 直线行驶，停止后记录惯性滑行的计数
//! - [`ramp`]: 功率线性爬升/下降
//! - [`collect_ir_samples`]: 采集红外读数用于标定

use crate::config::StraightConfig;
use crate::error::ControlError;
use crate::pid::Pid;
use qbot_driver::RobotLink;
use qbot_protocol::{IR_SENSOR_COUNT, Pwm};
use serde::Serialize;
use spin_sleep::SpinSleeper;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info};

/// 直线行驶的一次采样
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StraightSample {
    pub left_ticks: f64,
    pub right_ticks: f64,
    /// 本周期下发的功率；滑行阶段为 `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pwm: Option<Pwm>,
}

impl StraightSample {
    pub fn skew(&self) -> f64 {
        self.right_ticks - self.left_ticks
    }
}

/// 直线行驶调参
///
/// 功率钳位到 `[0, 100]`（只前进不后退）。结束后下发停止命令，再以
/// `coast_period_ms` 为间隔采样 `coast_samples` 次计数。
pub fn run_straight<L: RobotLink>(
    link: &mut L,
    config: &StraightConfig,
    stop: &AtomicBool,
) -> Result<Vec<StraightSample>, ControlError> {
    if config.period_ms == 0 || config.coast_period_ms == 0 {
        return Err(ControlError::Config("periods must be > 0".to_string()));
    }

    stop_on_error(link, |link| straight_body(link, config, stop))
}

fn straight_body<L: RobotLink>(
    link: &mut L,
    config: &StraightConfig,
    stop: &AtomicBool,
) -> Result<Vec<StraightSample>, ControlError> {
    let sleeper = SpinSleeper::default();
    let period = Duration::from_millis(config.period_ms);
    let mut pid = Pid::from_gains(config.gains());
    let mut samples = Vec::with_capacity(config.cycles + config.coast_samples);

    for _ in 0..config.cycles {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        sleeper.sleep(period);

        let (left, right) = link.read_encoders()?;
        let delta = pid.feed(right - left - config.turn as f64);

        let pwm = Pwm::from_output(config.power + delta, config.power - delta);
        let pwm = Pwm::new(pwm.left.max(0), pwm.right.max(0));
        link.command_power(pwm)?;

        debug!("{:7} {:7} {:7} {:7} {:7}", right - left, left, right, pwm.left, pwm.right);
        samples.push(StraightSample {
            left_ticks: left,
            right_ticks: right,
            pwm: Some(pwm),
        });
    }

    link.stop()?;

    // 停止后继续记录，观察惯性滑行
    let coast_period = Duration::from_millis(config.coast_period_ms);
    for _ in 0..config.coast_samples {
        sleeper.sleep(coast_period);
        let (left, right) = link.read_encoders()?;
        debug!("{:7} {:7} {:7}", right - left, left, right);
        samples.push(StraightSample {
            left_ticks: left,
            right_ticks: right,
            pwm: None,
        });
    }

    Ok(samples)
}

/// 从 `from` 到 `to` 的等差序列，共 `samples` 个值（含两端）
pub fn ramp_values(from: f64, to: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![to],
        n => {
            let step = (to - from) / (n - 1) as f64;
            (0..n).map(|i| from + step * i as f64).collect()
        },
    }
}

/// 相邻两个功率值之间的间隔数（至少为 1）
fn ramp_steps(samples: usize) -> u32 {
    u32::try_from(samples.saturating_sub(1).max(1)).unwrap_or(u32::MAX)
}

/// 两轮同步的功率爬升
///
/// 在 `duration` 内均匀下发 `samples` 个功率值，返回实际下发的功率。
pub fn ramp<L: RobotLink>(
    link: &mut L,
    from: f64,
    to: f64,
    duration: Duration,
    samples: usize,
) -> Result<Vec<Pwm>, ControlError> {
    let values = ramp_values(from, to, samples);
    let interval = duration / ramp_steps(samples);
    let sleeper = SpinSleeper::default();

    stop_on_error(link, |link| {
        let mut sent = Vec::with_capacity(values.len());
        for (i, power) in values.into_iter().enumerate() {
            if i > 0 {
                sleeper.sleep(interval);
            }
            let pwm = Pwm::from_output(power, power);
            link.command_power(pwm)?;
            sent.push(pwm);
        }

        info!("Ramp {:.0} -> {:.0} done ({} steps)", from, to, sent.len());
        Ok(sent)
    })
}

/// 采集红外读数
pub fn collect_ir_samples<L: RobotLink>(
    link: &mut L,
    count: usize,
    period: Duration,
) -> Result<Vec<[f64; IR_SENSOR_COUNT]>, ControlError> {
    let sleeper = SpinSleeper::default();
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        sleeper.sleep(period);
        samples.push(link.read_ir()?);
    }
    Ok(samples)
}

/// 执行 `body`；出错时尽量下发停止命令，然后返回原始错误
pub fn stop_on_error<L, T, F>(link: &mut L, body: F) -> Result<T, ControlError>
where
    L: RobotLink,
    F: FnOnce(&mut L) -> Result<T, ControlError>,
{
    body(&mut *link).inspect_err(|e| {
        error!("Routine failed: {}", e);
        if let Err(stop_err) = link.stop() {
            error!("Failed to stop motors: {}", stop_err);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_values_inclusive() {
        let values = ramp_values(30.0, 100.0, 8);
        assert_eq!(values.len(), 8);
        assert_eq!(values[0], 30.0);
        assert!((values[7] - 100.0).abs() < 1e-9);
        assert!((values[1] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_ramp_values_descending() {
        let values = ramp_values(100.0, 30.0, 3);
        assert_eq!(values, vec![100.0, 65.0, 30.0]);
    }

    #[test]
    fn test_ramp_values_degenerate() {
        assert!(ramp_values(0.0, 10.0, 0).is_empty());
        assert_eq!(ramp_values(0.0, 10.0, 1), vec![10.0]);
    }

    #[test]
    fn test_ramp_steps() {
        assert_eq!(ramp_steps(0), 1);
        assert_eq!(ramp_steps(1), 1);
        assert_eq!(ramp_steps(8), 7);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_ramp_steps_saturate_instead_of_truncating() {
        // 直接截断为 u32 时结果为 0
        assert_eq!(ramp_steps((1usize << 32) + 1), u32::MAX);
        assert!(Duration::from_millis(500) / ramp_steps(usize::MAX) > Duration::ZERO);
    }

    #[test]
    fn test_straight_sample_serializes_pwm() {
        let s = StraightSample {
            left_ticks: 3.0,
            right_ticks: 5.0,
            pwm: Some(Pwm::new(61, 58)),
        };
        let text = toml::to_string(&s).unwrap();
        assert!(text.contains("left_ticks = 3.0"));
        assert!(text.contains("[pwm]"));
        assert!(text.contains("left = 61"));

        let coasting = StraightSample { pwm: None, ..s };
        assert!(!toml::to_string(&coasting).unwrap().contains("pwm"));
    }

    #[test]
    fn test_straight_sample_skew() {
        let s = StraightSample {
            left_ticks: 10.0,
            right_ticks: 14.0,
            pwm: None,
        };
        assert_eq!(s.skew(), 4.0);
    }
}
