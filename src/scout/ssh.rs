//! SSH scout backend: remote `find` bounded to the requested depth.
//!
//! Authentication is delegated to the ambient SSH agent or keys; the
//! request's password is accepted but never transmitted.

use tokio::process::Command;

use super::{BackendCapture, ScoutRequest};

const DEFAULT_PORT: u16 = 22;
const DENIED_MARKER: &str = "Permission denied";

/// Run the remote listing and normalize its output.
pub(crate) async fn enumerate(req: &ScoutRequest) -> BackendCapture {
    let port = if req.port == 0 { DEFAULT_PORT } else { req.port };
    let target = format!("{}@{}", req.username, req.host);
    let depth = req.depth.to_string();

    let output = Command::new("ssh")
        .args([
            "-p",
            &port.to_string(),
            &target,
            "find",
            &req.start_dir,
            "-maxdepth",
            &depth,
            "-type",
            "f",
            "-printf",
            "%p\\n",
        ])
        .output()
        .await;

    match output {
        Ok(out) => BackendCapture {
            normalized: normalize(
                &String::from_utf8_lossy(&out.stdout),
                &String::from_utf8_lossy(&out.stderr),
            ),
            command_error: (!out.status.success())
                .then(|| format!("ssh command failed: {}", out.status)),
        },
        Err(err) => BackendCapture {
            normalized: String::new(),
            command_error: Some(format!("ssh command failed: {err}")),
        },
    }
}

/// Map stdout lines to `FILE|` records and permission-denied stderr
/// lines to `DENIED|` records, stdout first. All other stderr noise
/// (banners, MOTD) is dropped.
#[must_use]
pub fn normalize(stdout: &str, stderr: &str) -> String {
    let mut buf = String::new();

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        buf.push_str("FILE|");
        buf.push_str(line);
        buf.push('\n');
    }

    for line in stderr.lines() {
        if line.contains(DENIED_MARKER) {
            buf.push_str("DENIED|");
            buf.push_str(line.trim());
            buf.push('\n');
        }
    }

    buf
}
