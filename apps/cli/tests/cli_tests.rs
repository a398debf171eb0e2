//! qbot-cli 端到端测试

use assert_cmd::Command;
use predicates::prelude::*;
use std::net::{SocketAddr, UdpSocket};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// 回环地址上的模拟机器人
struct FakeRobot {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeRobot {
    fn spawn() -> Self {
        Self::spawn_ignoring(None)
    }

    /// 收到 `ignored` 帧时不应答
    fn spawn_ignoring(ignored: Option<&'static str>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket.set_read_timeout(Some(Duration::from_millis(20))).unwrap();
        let addr = socket.local_addr().unwrap();
        let stop = Arc::new(AtomicBool::new(false));
        let received = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let stop = stop.clone();
            let received = received.clone();
            thread::spawn(move || {
                let mut buf = [0u8; 1024];
                while !stop.load(Ordering::Relaxed) {
                    let Ok((len, from)) = socket.recv_from(&mut buf) else {
                        continue;
                    };
                    let frame = String::from_utf8_lossy(&buf[..len]).to_string();
                    received.lock().unwrap().push(frame.clone());
                    if ignored == Some(frame.as_str()) {
                        continue;
                    }
                    let reply = match &buf[..len] {
                        b"$CHECK*\n" => "Hello from QuickBot\n",
                        b"$PWM?*\n" => "[0.0, 0.0]\n",
                        b"$ENVAL?*\n" => "[120.0, 118.0]\n",
                        b"$ENVEL?*\n" => "[3.5, 3.25]\n",
                        b"$IRVAL?*\n" => "[10.0, 20.0, 30.0, 40.0, 50.0]\n",
                        _ => continue,
                    };
                    socket.send_to(reply.as_bytes(), from).unwrap();
                }
            })
        };

        Self {
            addr,
            received,
            stop,
            handle: Some(handle),
        }
    }
}

impl FakeRobot {
    /// 等待最后一帧等于 `frame`
    fn wait_for_last_frame(&self, frame: &str) -> Option<String> {
        for _ in 0..100 {
            let last = self.received.lock().unwrap().last().cloned();
            if last.as_deref() == Some(frame) {
                return last;
            }
            thread::sleep(Duration::from_millis(10));
        }
        self.received.lock().unwrap().last().cloned()
    }
}

impl Drop for FakeRobot {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn qbot_cli(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("qbot-cli").unwrap();
    // 避免读取真实用户目录下的配置
    cmd.env("HOME", config_dir.path())
        .env("XDG_CONFIG_HOME", config_dir.path())
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    qbot_cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("behave"))
        .stdout(predicate::str::contains("straight"))
        .stdout(predicate::str::contains("ir-sample"));
}

#[test]
fn test_config_show_merges_file_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qbot.toml");
    std::fs::write(
        &path,
        r#"
[link]
robot_addr = "192.168.0.5:5005"
base_addr = "192.168.0.6:5005"

[behavior]
cycles = 42
"#,
    )
    .unwrap();

    qbot_cli(&dir)
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cycles = 42"))
        .stdout(predicate::str::contains("period_ms = 50"))
        .stdout(predicate::str::contains("192.168.0.5:5005"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    qbot_cli(&dir)
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_check_without_address_fails() {
    let dir = tempfile::tempdir().unwrap();
    qbot_cli(&dir)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--robot"));
}

#[test]
fn test_check_against_fake_robot() {
    let dir = tempfile::tempdir().unwrap();
    let robot = FakeRobot::spawn();

    qbot_cli(&dir)
        .args(["--robot", &robot.addr.to_string(), "--base", "127.0.0.1:0"])
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("握手成功"));
}

#[test]
fn test_read_against_fake_robot() {
    let dir = tempfile::tempdir().unwrap();
    let robot = FakeRobot::spawn();

    qbot_cli(&dir)
        .args(["--robot", &robot.addr.to_string(), "--base", "127.0.0.1:0"])
        .arg("read")
        .assert()
        .success()
        .stdout(predicate::str::contains("120.0"))
        .stdout(predicate::str::contains("[10.0, 20.0, 30.0, 40.0, 50.0]"));
}

#[test]
fn test_timeout_reported() {
    let dir = tempfile::tempdir().unwrap();
    // 绑定但从不应答
    let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
    let addr = silent.local_addr().unwrap();

    qbot_cli(&dir)
        .args(["--robot", &addr.to_string(), "--base", "127.0.0.1:0", "--timeout-ms", "100"])
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout"));
}

#[test]
fn test_ramp_failure_stops_motors() {
    let dir = tempfile::tempdir().unwrap();
    // 不应答速度查询：爬升到 100 后超时
    let robot = FakeRobot::spawn_ignoring(Some("$ENVEL?*\n"));

    qbot_cli(&dir)
        .args(["--robot", &robot.addr.to_string(), "--base", "127.0.0.1:0", "--timeout-ms", "200"])
        .args(["ramp", "--duration-ms", "20", "--samples", "3", "--hold-ms", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout"));

    assert_eq!(robot.wait_for_last_frame("$PWM=0,0*\n").as_deref(), Some("$PWM=0,0*\n"));
}

#[test]
fn test_straight_toml_output() {
    let dir = tempfile::tempdir().unwrap();
    let robot = FakeRobot::spawn();

    qbot_cli(&dir)
        .args(["--robot", &robot.addr.to_string(), "--base", "127.0.0.1:0"])
        .args(["straight", "--cycles", "2", "--toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[[samples]]"))
        .stdout(predicate::str::contains("left_ticks = 120.0"))
        .stdout(predicate::str::contains("[samples.pwm]"));
}

#[test]
fn test_behave_short_run() {
    let dir = tempfile::tempdir().unwrap();
    let robot = FakeRobot::spawn();

    qbot_cli(&dir)
        .args(["--robot", &robot.addr.to_string(), "--base", "127.0.0.1:0"])
        .args(["behave", "--cycles", "2", "--period-ms", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 个周期"));

    // 复位、握手之后以停止命令收尾
    assert_eq!(robot.wait_for_last_frame("$PWM=0,0*\n").as_deref(), Some("$PWM=0,0*\n"));
}
