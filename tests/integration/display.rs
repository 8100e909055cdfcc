//! Integration tests for the display binary's operator commands.

use std::process::{Command, Output};

use crate::common::{get_display_bin, start_server, test_dir};

fn run_display(args: &[&str]) -> Output {
    Command::new(get_display_bin())
        .env("FLOORBOARD_INTEGRATION_TEST", "1")
        .env_remove("FLOORBOARD_API_URL")
        .env_remove("FLOORBOARD_STORE")
        .env_remove("FLOORBOARD_PROBE_PORTS")
        .args(args)
        .output()
        .expect("failed to run display")
}

#[test]
fn set_persists_to_the_shared_store() {
    let dir = test_dir("display_set");
    let store = dir.join("display.json");
    let store = store.to_str().unwrap();

    let out = run_display(&["set", "screens", "3", "--store", store]);
    assert!(out.status.success(), "set failed: {out:?}");
    let out = run_display(&["set", "speed", "2500", "--store", store]);
    assert!(out.status.success(), "set failed: {out:?}");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store).unwrap()).unwrap();
    // persisted as plain stringified scalars
    assert_eq!(json["totalScreens"], "3");
    assert_eq!(json["carouselSpeed"], "2500");
}

#[test]
fn invalid_settings_are_rejected() {
    let dir = test_dir("display_invalid");
    let store = dir.join("display.json");

    let out = run_display(&["set", "screens", "0", "--store", store.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1), "zero screens must fail: {out:?}");
    assert!(!store.exists(), "rejected values must not be persisted");
}

#[test]
fn explicit_url_is_used_verbatim() {
    let out = run_display(&["resolve", "--api-url", "http://10.9.8.7:4000/api"]);
    assert!(out.status.success(), "resolve failed: {out:?}");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), "http://10.9.8.7:4000/api (explicit override)");
}

#[tokio::test]
async fn resolve_discovers_a_local_server() {
    let workdir = test_dir("display_resolve");
    let (_server, info) = start_server(&workdir, &[]).await;
    let port = info.port.to_string();
    // nothing listens on the fallback port, so only discovery can find the server
    let unused = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
        .to_string();

    let out = tokio::task::spawn_blocking(move || {
        run_display(&[
            "resolve",
            "--loopback-first",
            "--probe-ports",
            &port,
            "--api-port",
            &unused,
        ])
    })
    .await
    .unwrap();
    assert!(out.status.success(), "resolve failed: {out:?}");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains(&format!(":{}/api", info.port)),
        "unexpected resolution: {stdout}"
    );
    assert!(
        stdout.contains("(published endpoint file)") || stdout.contains("(active probing)"),
        "server must be found by discovery, not the fallback: {stdout}"
    );
}
