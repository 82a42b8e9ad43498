//! Evil-WinRM scout backend: remote PowerShell directory walker.
//!
//! Submits a script that recursively walks the tree to the requested
//! depth, emitting `FILE|<full path>` for leaf files and `DENIED|<path>`
//! where an access error is caught. The script is flattened to a single
//! line before invocation.

use tokio::process::Command;

use super::{BackendCapture, ScoutRequest};

const DEFAULT_PORT: u16 = 5985;

/// Run the remote walker and normalize its output.
pub(crate) async fn enumerate(req: &ScoutRequest) -> BackendCapture {
    let port = if req.port == 0 { DEFAULT_PORT } else { req.port };
    let script = walker_script(&req.start_dir, req.depth);

    let output = Command::new("evil-winrm")
        .args([
            "-i",
            &req.host,
            "-u",
            &req.username,
            "-p",
            &req.password,
            "-P",
            &port.to_string(),
            "-c",
            &script,
        ])
        .output()
        .await;

    match output {
        Ok(out) => {
            // Streams are captured separately; stderr records land
            // after the full stdout capture, not in arrival order.
            let mut raw = String::from_utf8_lossy(&out.stdout).into_owned();
            raw.push_str(&String::from_utf8_lossy(&out.stderr));
            BackendCapture {
                normalized: normalize(&raw),
                command_error: (!out.status.success())
                    .then(|| format!("evil-winrm command failed: {}", out.status)),
            }
        }
        Err(err) => BackendCapture {
            normalized: String::new(),
            command_error: Some(format!("evil-winrm command failed: {err}")),
        },
    }
}

/// Depth-bounded recursive walker emitting the output contract
/// directly, flattened to one line for `-c`.
fn walker_script(start_dir: &str, depth: i32) -> String {
    let script = format!(
        r#"
$start = "{start_dir}"
$depth = {depth}
function Walk($path, $level) {{
    if ($level -gt $depth) {{ return }}
    try {{
        Get-ChildItem -Path $path -ErrorAction Stop | ForEach-Object {{
            if ($_.PSIsContainer) {{
                Walk $_.FullName ($level + 1)
            }} else {{
                "FILE|$($_.FullName)"
            }}
        }}
    }} catch {{
        "DENIED|$path"
    }}
}}
Walk $start 0
"#
    );
    script.replace('\n', " ")
}

/// Pass through only lines already carrying the output contract;
/// everything else (banners, prompts) is discarded.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut buf = String::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("FILE|") || line.starts_with("DENIED|") {
            buf.push_str(line);
            buf.push('\n');
        }
    }
    buf
}
