use pivotd::scout::{smb, ssh, winrm};

#[test]
fn ssh_maps_stdout_to_file_records_and_denied_stderr() {
    let stdout = "/etc/passwd\n/etc/shadow\n\n";
    let stderr = "find: '/root/secrets': Permission denied\n";

    let out = ssh::normalize(stdout, stderr);

    assert_eq!(
        out,
        "FILE|/etc/passwd\nFILE|/etc/shadow\nDENIED|find: '/root/secrets': Permission denied\n"
    );
}

#[test]
fn ssh_drops_unrelated_stderr_noise() {
    let out = ssh::normalize("", "Warning: Permanently added 'host' to known hosts.\n");
    assert!(out.is_empty());
}

#[test]
fn ssh_stdout_records_precede_stderr_records() {
    let out = ssh::normalize("/a\n", "x Permission denied\n");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec!["FILE|/a", "DENIED|x Permission denied"]);
}

#[test]
fn smb_maps_denied_and_listing_lines() {
    let raw = "NT_STATUS_ACCESS_DENIED listing \\x\n  secret.txt    A    0  Mon Jan  1 00:00:00 2024\n";

    let out = smb::normalize(raw);

    assert_eq!(
        out,
        "DENIED|NT_STATUS_ACCESS_DENIED listing \\x\nFILE|secret.txt\n"
    );
}

#[test]
fn smb_drops_directory_markers_and_blank_lines() {
    let raw = "  .    D    0  Mon Jan  1 00:00:00 2024\n  ..   D    0  Mon Jan  1 00:00:00 2024\n\n  notes.txt   A   12  Mon Jan  1 00:00:00 2024\n";

    let out = smb::normalize(raw);

    assert_eq!(out, "FILE|notes.txt\n");
}

#[test]
fn winrm_passes_through_contract_lines_only() {
    let raw = "Evil-WinRM shell v3.5\nInfo: Establishing connection\nFILE|C:\\Users\\bob\\flag.txt\nDENIED|C:\\Windows\\System32\\config\nPS C:\\> exit\n";

    let out = winrm::normalize(raw);

    assert_eq!(
        out,
        "FILE|C:\\Users\\bob\\flag.txt\nDENIED|C:\\Windows\\System32\\config\n"
    );
}

#[test]
fn winrm_trims_surrounding_whitespace() {
    let out = winrm::normalize("   FILE|C:\\a.txt   \n");
    assert_eq!(out, "FILE|C:\\a.txt\n");
}
