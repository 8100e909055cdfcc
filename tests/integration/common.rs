//! Common utilities for integration tests.
//!
//! This module provides shared functions and types used across multiple integration test modules,
//! such as spawning processes, managing ports, and waiting for services to be ready.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use floorboard_common::{ENDPOINT_FILE_NAME, EndpointInfo};

pub fn get_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("failed to bind to address")
        .local_addr()
        .unwrap()
        .port()
}

/// Holds a port whose successor is currently free, and returns both the guard and the port.
pub fn occupy_port_below_free_one() -> (std::net::TcpListener, u16) {
    loop {
        let occupant = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let occupied = occupant.local_addr().unwrap().port();
        if occupied < u16::MAX && std::net::TcpListener::bind(("127.0.0.1", occupied + 1)).is_ok() {
            return (occupant, occupied);
        }
    }
}

/// Guard that kills and waits on a child process when dropped.
pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        drop(self.0.kill());
        drop(self.0.wait());
    }
}

fn get_server_bin() -> &'static str {
    env!("CARGO_BIN_EXE_server")
}

pub fn get_display_bin() -> &'static str {
    env!("CARGO_BIN_EXE_display")
}

/// A fresh, empty working directory for one test.
pub fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("floorboard_it_{name}_{}", std::process::id()));
    drop(std::fs::remove_dir_all(&dir));
    std::fs::create_dir_all(&dir).expect("failed to create test dir");
    dir
}

/// Spawn the server in `workdir` with a preferred port and optional env pairs.
///
/// The endpoint file and the default data file both live in `workdir`.
pub fn spawn_server(workdir: &Path, port: u16, envs: &[(&str, &str)]) -> KillOnDrop {
    let mut cmd = Command::new(get_server_bin());
    cmd.current_dir(workdir)
        .env("PORT", port.to_string())
        .env("HOST", "127.0.0.1")
        .env("FLOORBOARD_INTEGRATION_TEST", "1")
        .env_remove("CORS_ORIGINS")
        .env_remove("DATABASE_PATH");
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let child = cmd
        .arg("control-service")
        .stdout(Stdio::null())
        .spawn()
        .expect("failed to start server");
    KillOnDrop(child)
}

/// Block until the server in `workdir` published its endpoint file, and return it.
pub async fn wait_for_endpoint_file(workdir: &Path, timeout_secs: u64) -> EndpointInfo {
    let path = workdir.join(ENDPOINT_FILE_NAME);
    let start = Instant::now();
    loop {
        // the file may be observed half-written
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(info) = serde_json::from_str::<EndpointInfo>(&content)
        {
            return info;
        }
        if start.elapsed() > Duration::from_secs(timeout_secs) {
            panic!("server did not publish its endpoint within timeout");
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Block until a TCP listener is accepting on `127.0.0.1:port` or timeout.
pub async fn wait_for_listening(port: u16, timeout_secs: u64) {
    let start = Instant::now();
    while std::net::TcpStream::connect(("127.0.0.1", port)).is_err() {
        if start.elapsed() > Duration::from_secs(timeout_secs) {
            panic!("server did not start within timeout");
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Start a server on a free port and wait until it serves.
pub async fn start_server(workdir: &Path, envs: &[(&str, &str)]) -> (KillOnDrop, EndpointInfo) {
    let guard = spawn_server(workdir, get_free_port(), envs);
    let info = wait_for_endpoint_file(workdir, 10).await;
    wait_for_listening(info.port, 5).await;
    (guard, info)
}
