//! Route flow integration tests.
//!
//! Run with: cargo test --test route_flow_test -- --ignored
//!
//! Note: Requires a running route server at http://localhost:3000
//! or set ROUTE_TEST_URL environment variable.

use reqwest::Client;
use route_core::{offset_by_meters, Coordinate};
use serde_json::{json, Value};
use std::time::Duration;

fn base_url() -> String {
    std::env::var("ROUTE_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

async fn route(client: &Client, base: &str) -> Value {
    client
        .get(format!("{}/v1/route", base))
        .send()
        .await
        .expect("Failed to fetch route")
        .json()
        .await
        .unwrap()
}

#[tokio::test]
#[ignore] // Run only when server is running
async fn test_drive_to_single_stop() {
    let client = Client::new();
    let base = base_url();

    client.post(format!("{}/v1/route/clear", base)).send().await.unwrap();

    let stop = Coordinate::new(33.6846, -117.8265).unwrap();
    let resp = client
        .post(format!("{}/v1/waypoints", base))
        .json(&stop)
        .send()
        .await
        .expect("Failed to add waypoint");
    assert_eq!(resp.status().as_u16(), 201);

    let resp = client
        .post(format!("{}/v1/route/request", base))
        .json(&json!({ "origin": offset_by_meters(&stop, -1000.0, 0.0) }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let near = offset_by_meters(&stop, -40.0, 0.0);
    let resp = client
        .post(format!("{}/v1/positions", base))
        .json(&near)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 202);

    // Samples are applied by the background loop.
    let mut prompt_open = false;
    for _ in 0..20 {
        if route(&client, &base).await["phase"]["name"] == "prompt_open" {
            prompt_open = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(prompt_open, "Prompt should open near the stop");

    let resp = client
        .post(format!("{}/v1/prompt/resolve", base))
        .json(&json!({ "accept": true }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["finished"], true);

    let resp = client.post(format!("{}/v1/route/report", base)).send().await.unwrap();
    assert!(resp.status().is_success());
    assert_eq!(route(&client, &base).await["phase"]["name"], "idle");
}

#[tokio::test]
#[ignore]
async fn test_add_after_request_is_rejected() {
    let client = Client::new();
    let base = base_url();

    client.post(format!("{}/v1/route/clear", base)).send().await.unwrap();
    client
        .post(format!("{}/v1/waypoints", base))
        .json(&json!({ "lat": 33.68, "lon": -117.82 }))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/v1/route/request", base))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{}/v1/waypoints", base))
        .json(&json!({ "lat": 33.69, "lon": -117.83 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "route_locked");
}
