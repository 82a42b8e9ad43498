use serde_json::{json, Value};

use super::test_helpers::spawn_server;

#[tokio::test]
async fn status_reports_idle_by_default() {
    let server = spawn_server().await;

    let body: Value = reqwest::get(server.url("/api/status"))
        .await
        .expect("get")
        .json()
        .await
        .expect("json");
    assert_eq!(body["proxy_running"], false);
}

#[tokio::test]
async fn stop_is_idempotent_when_idle() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(server.url("/api/stop-proxy"))
        .send()
        .await
        .expect("post");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["status"], "not_running");
}

#[tokio::test]
async fn start_with_missing_binary_reports_start_failure() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    // The default proxy binary path does not exist in the test env.
    let resp = client
        .post(server.url("/api/start-proxy"))
        .send()
        .await
        .expect("post");
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.expect("json");
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("failed to start proxy")));

    let body: Value = reqwest::get(server.url("/api/status"))
        .await
        .expect("get")
        .json()
        .await
        .expect("json");
    assert_eq!(body["proxy_running"], false);
}

#[cfg(unix)]
#[tokio::test]
async fn proxy_lifecycle_over_the_api() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    // Point the proxy at a spawnable binary.
    let resp = client
        .post(server.url("/api/config"))
        .json(&json!({ "proxy_binary": "sleep" }))
        .send()
        .await
        .expect("post config");
    assert_eq!(resp.status(), 200);

    let resp = client
        .post(server.url("/api/start-proxy"))
        .send()
        .await
        .expect("start");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["status"], "started");

    let body: Value = reqwest::get(server.url("/api/status"))
        .await
        .expect("get")
        .json()
        .await
        .expect("json");
    assert_eq!(body["proxy_running"], true);

    let resp = client
        .post(server.url("/api/start-proxy"))
        .send()
        .await
        .expect("second start");
    assert_eq!(resp.status(), 409);

    let resp = client
        .post(server.url("/api/stop-proxy"))
        .send()
        .await
        .expect("stop");
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["status"], "stopped");

    let body: Value = reqwest::get(server.url("/api/status"))
        .await
        .expect("get")
        .json()
        .await
        .expect("json");
    assert_eq!(body["proxy_running"], false);
}
