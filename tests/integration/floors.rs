//! Integration tests for the floor data endpoints and live reload.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;

use crate::common::{start_server, test_dir};

const FLOORS: &str = r#"
[display]
total_screens = 2
carousel_speed_ms = 4000

[[floors]]
id = 2
name = "First"
level = 1

[[floors]]
id = 1
name = "Ground"
level = 0

[[floors.rooms]]
id = 10
name = "Kitchen"
capacity = 4
occupied = 3
"#;

async fn get_json(client: &Client, url: &str) -> (u16, Value) {
    let res = client.get(url).send().await.expect("request failed");
    let status = res.status().as_u16();
    (status, res.json().await.unwrap_or(Value::Null))
}

#[tokio::test]
async fn floors_are_served_in_display_order() {
    let workdir = test_dir("floors");
    std::fs::write(workdir.join("floorboard.toml"), FLOORS).unwrap();
    let (_server, info) = start_server(&workdir, &[]).await;
    let base = format!("http://127.0.0.1:{}/api", info.port);
    let client = Client::new();

    let (status, floors) = get_json(&client, &format!("{base}/floors")).await;
    assert_eq!(status, 200);
    assert_eq!(floors[0]["name"], "Ground");
    assert_eq!(floors[0]["rooms"][0]["occupied"], 3);
    assert_eq!(floors[1]["name"], "First");

    let (status, floor) = get_json(&client, &format!("{base}/floors/2")).await;
    assert_eq!(status, 200);
    assert_eq!(floor["name"], "First");

    let (status, _) = get_json(&client, &format!("{base}/floors/99")).await;
    assert_eq!(status, 404);

    let (_, defaults) = get_json(&client, &format!("{base}/display-defaults")).await;
    assert_eq!(defaults["totalScreens"], 2);
    assert_eq!(defaults["carouselSpeedMs"], 4000);
}

#[tokio::test]
async fn missing_data_file_serves_empty_list_and_picks_up_creation() {
    let workdir = test_dir("floors_live");
    let (_server, info) = start_server(&workdir, &[]).await;
    let url = format!("http://127.0.0.1:{}/api/floors", info.port);
    let client = Client::new();

    let (status, floors) = get_json(&client, &url).await;
    assert_eq!(status, 200);
    assert_eq!(floors, Value::Array(Vec::new()));

    std::fs::write(workdir.join("floorboard.toml"), FLOORS).unwrap();

    let start = Instant::now();
    loop {
        let (_, floors) = get_json(&client, &url).await;
        if floors.as_array().is_some_and(|f| f.len() == 2) {
            break;
        }
        assert!(
            start.elapsed() < Duration::from_secs(10),
            "created data file was not picked up"
        );
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}
