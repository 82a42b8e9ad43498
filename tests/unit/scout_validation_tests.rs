use pivotd::scout::{sanitize_host, Mode, Protocol, ScoutRequest};
use pivotd::AppError;

fn valid_request(protocol: Protocol) -> ScoutRequest {
    ScoutRequest {
        protocol,
        host: "10.0.0.5".into(),
        port: 0,
        username: "operator".into(),
        password: "hunter2".into(),
        smb_share: "C$".into(),
        start_dir: "/home".into(),
        depth: 3,
        mode: None,
    }
}

fn assert_invalid(result: pivotd::Result<()>, needle: &str) {
    match result {
        Err(AppError::InvalidRequest(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} missing {needle:?}");
        }
        other => panic!("expected InvalidRequest, got {other:?}"),
    }
}

#[test]
fn rejects_empty_host() {
    let mut req = valid_request(Protocol::Ssh);
    req.host = "  ".into();
    assert_invalid(req.validate(), "host");
}

#[test]
fn rejects_empty_username() {
    let mut req = valid_request(Protocol::Ssh);
    req.username = String::new();
    assert_invalid(req.validate(), "username and password");
}

#[test]
fn rejects_empty_password() {
    let mut req = valid_request(Protocol::Ssh);
    req.password = String::new();
    assert_invalid(req.validate(), "username and password");
}

#[test]
fn rejects_empty_start_dir() {
    let mut req = valid_request(Protocol::Ssh);
    req.start_dir = String::new();
    assert_invalid(req.validate(), "start directory");
}

#[test]
fn rejects_smb_without_share() {
    let mut req = valid_request(Protocol::Smb);
    req.smb_share = String::new();
    assert_invalid(req.validate(), "SMB share");
}

#[test]
fn share_is_optional_outside_smb() {
    let mut req = valid_request(Protocol::Ssh);
    req.smb_share = String::new();
    assert!(req.validate().is_ok());
}

#[test]
fn depth_below_one_normalizes_to_three() {
    let mut req = valid_request(Protocol::Ssh);
    req.depth = 0;
    req.validate().expect("valid");
    assert_eq!(req.depth, 3);

    let mut req = valid_request(Protocol::Ssh);
    req.depth = -7;
    req.validate().expect("valid");
    assert_eq!(req.depth, 3);
}

#[test]
fn positive_depth_is_kept() {
    let mut req = valid_request(Protocol::Ssh);
    req.depth = 9;
    req.validate().expect("valid");
    assert_eq!(req.depth, 9);
}

#[test]
fn missing_mode_defaults_to_fast() {
    let req = valid_request(Protocol::Ssh);
    assert_eq!(req.effective_mode(), Mode::Fast);
}

#[test]
fn explicit_mode_is_kept() {
    let mut req = valid_request(Protocol::Ssh);
    req.mode = Some(Mode::Stealth);
    assert_eq!(req.effective_mode(), Mode::Stealth);
}

#[test]
fn request_parses_wire_names() {
    let req: ScoutRequest = serde_json::from_str(
        r#"{"protocol":"evil-winrm","host":"h","username":"u","password":"p","start_dir":"/","mode":"stealth"}"#,
    )
    .expect("parses");
    assert_eq!(req.protocol, Protocol::EvilWinrm);
    assert_eq!(req.mode, Some(Mode::Stealth));
}

#[test]
fn empty_mode_string_parses_as_unset() {
    let req: ScoutRequest = serde_json::from_str(
        r#"{"protocol":"ssh","host":"h","username":"u","password":"p","start_dir":"/","mode":""}"#,
    )
    .expect("parses");
    assert_eq!(req.mode, None);
    assert_eq!(req.effective_mode(), Mode::Fast);
}

#[test]
fn unknown_request_field_is_rejected() {
    let err = serde_json::from_str::<ScoutRequest>(r#"{"protocol":"ssh","bogus":1}"#);
    assert!(err.is_err());
}

#[test]
fn sanitize_host_replaces_path_hostile_characters() {
    assert_eq!(sanitize_host(" 10.0.0.5 "), "10.0.0.5");
    assert_eq!(sanitize_host("fe80::1"), "fe80__1");
    assert_eq!(sanitize_host("host/share"), "host_share");
}
