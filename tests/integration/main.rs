//! Uses the single integration test approach.
//!
//! This improves parallelism when running the tests, and reduces the number of binaries that have to be built (and linked)

mod common;
mod display;
mod floors;

use std::time::Duration;

use floorboard_common::{ENDPOINT_FILE_NAME, EndpointInfo};
use floorboard_display::resolver::{EndpointResolver, HttpProbe, ResolverConfig, Strategy};
use reqwest::Client;

use common::{spawn_server, start_server, test_dir, wait_for_endpoint_file, wait_for_listening};

#[tokio::test]
async fn occupied_port_moves_server_up_and_is_published() {
    // holding the listener keeps the preferred port busy for the whole test
    let (_occupied, preferred) = common::occupy_port_below_free_one();

    let workdir = test_dir("occupied");
    let _server = spawn_server(&workdir, preferred, &[]);
    let info = wait_for_endpoint_file(&workdir, 10).await;
    wait_for_listening(info.port, 5).await;

    assert_eq!(info.port, preferred + 1, "must take the lowest free port above");
    assert!(!info.is_default_port, "moved port must be flagged");
    assert!(
        info.api_url.ends_with(&format!(":{}/api", info.port)),
        "api url must point at the bound port: {}",
        info.api_url
    );

    let client = Client::new();
    let health = client
        .get(format!("http://127.0.0.1:{}/api/health", info.port))
        .send()
        .await
        .expect("health request failed");
    assert_eq!(health.status(), 200);

    let served: EndpointInfo = client
        .get(format!("http://127.0.0.1:{}/server-info.json", info.port))
        .send()
        .await
        .expect("endpoint request failed")
        .json()
        .await
        .expect("endpoint is not valid json");
    assert_eq!(served, info, "served endpoint must equal the published file");
}

#[tokio::test]
async fn free_port_is_used_as_is() {
    let workdir = test_dir("free");
    let (_server, info) = start_server(&workdir, &[]).await;
    assert!(info.is_default_port, "a free preferred port must be used unmodified");

    let raw = std::fs::read_to_string(workdir.join(ENDPOINT_FILE_NAME)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for key in ["port", "host", "apiUrl", "timestamp", "isDefaultPort", "electron"] {
        assert!(json.get(key).is_some(), "published file lacks {key}: {raw}");
    }
}

#[tokio::test]
async fn cors_allows_dev_ports_and_overrides_only() {
    let workdir = test_dir("cors");
    let (_server, info) =
        start_server(&workdir, &[("CORS_ORIGINS", " http://example.com , ")]).await;
    let url = format!("http://127.0.0.1:{}/api/floors", info.port);
    let client = Client::new();

    for (origin, allowed) in [
        ("http://localhost:3000", true),
        ("http://example.com", true),
        ("http://evil.example", false),
    ] {
        let res = client
            .request(reqwest::Method::OPTIONS, &url)
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await
            .expect("preflight failed");
        let echoed = res
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        if allowed {
            assert_eq!(echoed.as_deref(), Some(origin), "{origin} must be allowed");
        } else {
            assert_eq!(echoed, None, "{origin} must not be allowed");
        }
    }
}

#[tokio::test]
async fn resolver_finds_running_server() {
    let workdir = test_dir("resolve");
    let (_server, info) = start_server(&workdir, &[]).await;

    let resolver = EndpointResolver::new(
        ResolverConfig {
            // an unused port first, so discovery has to look past it
            ports: vec![common::get_free_port(), info.port],
            loopback_first: true,
            default_port: 9,
            ..ResolverConfig::default()
        },
        HttpProbe::new(Duration::from_millis(1000)).unwrap(),
    );
    let api_url = resolver.resolve().await;
    let strategy = resolver.current_value().unwrap().strategy;

    // the advertised host may not be reachable while bound to loopback, then probing takes over
    assert!(
        matches!(strategy, Strategy::PublishedFile | Strategy::Probing),
        "unexpected strategy {strategy}"
    );
    assert!(
        api_url.ends_with(&format!(":{}/api", info.port)),
        "resolved {api_url}, expected port {}",
        info.port
    );
}

#[tokio::test]
async fn resolver_falls_back_when_nothing_runs() {
    let unused = common::get_free_port();
    let resolver = EndpointResolver::new(
        ResolverConfig {
            ports: vec![unused],
            default_port: unused,
            ..ResolverConfig::default()
        },
        HttpProbe::new(Duration::from_millis(300)).unwrap(),
    );
    assert_eq!(resolver.resolve().await, format!("http://localhost:{unused}/api"));
    assert_eq!(
        resolver.current_value().map(|r| r.strategy),
        Some(Strategy::Fallback)
    );
}
