use pivotd::config::Settings;
use pivotd::installer::check_installed;
use pivotd::paths::AppDirs;

#[tokio::test]
async fn unset_proxy_path_reports_not_installed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dirs = AppDirs::rooted_at(temp.path());
    let settings = Settings {
        proxy_binary: String::new(),
        ..Settings::default()
    };

    let status = check_installed(&settings, &dirs).await;

    assert!(!status.installed);
    assert_eq!(status.reason, "proxy binary path not set");
}

#[tokio::test]
async fn missing_proxy_binary_reports_not_installed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dirs = AppDirs::rooted_at(temp.path());
    let settings = Settings {
        proxy_binary: temp
            .path()
            .join("absent-proxy")
            .to_string_lossy()
            .into_owned(),
        ..Settings::default()
    };

    let status = check_installed(&settings, &dirs).await;

    assert!(!status.installed);
    assert_eq!(status.reason, "proxy binary not found on disk");
}

#[tokio::test]
async fn present_binaries_report_installed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dirs = AppDirs::rooted_at(temp.path());

    let install_dir = dirs.install_dir();
    tokio::fs::create_dir_all(&install_dir).await.expect("mkdir");
    let proxy = install_dir.join("proxy");
    tokio::fs::write(&proxy, b"#!/bin/sh\n").await.expect("write");
    tokio::fs::write(install_dir.join("agent"), b"bin")
        .await
        .expect("write");

    let settings = Settings {
        proxy_binary: proxy.to_string_lossy().into_owned(),
        agent_binary: "agent".into(),
        ..Settings::default()
    };

    let status = check_installed(&settings, &dirs).await;

    assert!(status.installed);
    assert!(status.reason.is_empty());
}
