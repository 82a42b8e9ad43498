//! SMB scout backend: `smbclient` recursive share listing.

use tokio::process::Command;

use super::{BackendCapture, ScoutRequest};

const DENIED_MARKER: &str = "NT_STATUS_ACCESS_DENIED";

/// Run the recursive listing and normalize its output. stdout and
/// stderr are captured as one stream; smbclient interleaves access
/// errors with listing lines.
pub(crate) async fn enumerate(req: &ScoutRequest) -> BackendCapture {
    let target = format!("//{}/{}", req.host, req.smb_share);
    let user_arg = format!("{}%{}", req.username, req.password);

    let output = Command::new("smbclient")
        .args([target.as_str(), "-U", &user_arg, "-c", "recurse; ls"])
        .output()
        .await;

    match output {
        Ok(out) => {
            // Streams are captured separately; stderr records land
            // after the full listing, not in arrival order.
            let mut raw = String::from_utf8_lossy(&out.stdout).into_owned();
            raw.push_str(&String::from_utf8_lossy(&out.stderr));
            BackendCapture {
                normalized: normalize(&raw),
                command_error: (!out.status.success())
                    .then(|| format!("smbclient command failed: {}", out.status)),
            }
        }
        Err(err) => BackendCapture {
            normalized: String::new(),
            command_error: Some(format!("smbclient command failed: {err}")),
        },
    }
}

/// Map access-denied lines to `DENIED|` records and listing lines to
/// `FILE|<first token>` records, dropping the `.`/`..` markers and
/// blank lines.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut buf = String::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.contains(DENIED_MARKER) {
            buf.push_str("DENIED|");
            buf.push_str(line);
            buf.push('\n');
            continue;
        }

        if let Some(name) = line.split_whitespace().next() {
            if name != "." && name != ".." {
                buf.push_str("FILE|");
                buf.push_str(name);
                buf.push('\n');
            }
        }
    }

    buf
}
