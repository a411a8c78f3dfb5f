// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI integration tests.
//!
//! These tests run the actual sdfcodec binary and verify its behavior.

use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

/// Get the path to the built sdfcodec binary
fn sdfcodec_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    // The test binary is in target/debug/deps/
    // The sdfcodec binary is in target/debug/
    path.pop(); // deps
    path.pop(); // debug or release
    path.push("sdfcodec");
    path
}

/// Run sdfcodec with arguments
fn run(args: &[&str]) -> Output {
    let bin = sdfcodec_bin();
    Command::new(&bin)
        .args(args)
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", bin))
}

/// Run sdfcodec and assert success
fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run sdfcodec and assert failure
fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Session file in a temporary directory, removed on drop
struct SessionFile {
    dir: PathBuf,
    path: PathBuf,
}

impl SessionFile {
    fn new(content: &str) -> Self {
        let random = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        let dir = std::env::temp_dir().join(format!(
            "sdfcodec_cli_{}_{}",
            std::process::id(),
            random
        ));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.toml");
        fs::write(&path, content).unwrap();
        SessionFile { dir, path }
    }

    fn path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

impl Drop for SessionFile {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_ok(&["--help"]);
    assert!(output.contains("SDF wire format toolkit"));
    assert!(output.contains("decode"));
    assert!(output.contains("types"));
    assert!(output.contains("errors"));
    assert!(output.contains("show"));
}

#[test]
fn test_cli_version() {
    let output = run_ok(&["--version"]);
    assert!(output.contains("sdfcodec"));
}

#[test]
fn test_cli_invalid_subcommand() {
    let stderr = run_err(&["nonexistent"]);
    assert!(stderr.contains("unrecognized") || stderr.contains("unknown"));
}

// ============================================================================
// Decode Tests
// ============================================================================

#[test]
fn test_decode_stream() {
    let output = run_ok(&["decode", "9101 8d0001 61"]);
    assert!(output.contains("[0..2] true"));
    assert!(output.contains("[2..6]"));
    assert!(output.contains("2 values, 6 bytes"));
}

#[test]
fn test_decode_json() {
    let output = run_ok(&["decode", "--json", "0x820002 9d91 9d00000003 000100"]);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["offset"], 0);
    assert_eq!(entries[0]["length"], 13);
    assert_eq!(entries[0]["value"], serde_json::json!([false, true, false]));
}

#[test]
fn test_decode_with_session() {
    let session = SessionFile::new("[atom_cache]\n300 = \"hi\"\n");
    let output = run_ok(&["decode", "--json", "--session", &session.path(), "8c012c"]);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["value"]["atom"], "hi");
}

#[test]
fn test_decode_bad_session() {
    let session = SessionFile::new("[atom_cache]\nnot_an_id = \"hi\"\n");
    let stderr = run_err(&["decode", "--session", &session.path(), "9101"]);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("not a 16-bit cache id"));
}

#[test]
fn test_decode_time_outside_calendar_range() {
    let output = run_ok(&["decode", "af0f 01 8000000000000000 00000000 ffff"]);
    assert!(output.contains("-9223372036854775808s+0ns"));
}

#[test]
fn test_decode_item_limit() {
    let stderr = run_err(&["decode", "82000b 9e01000000 9e00000000 91"]);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("exceed the limit"));
}

#[test]
fn test_decode_malformed_input() {
    let stderr = run_err(&["decode", "07"]);
    assert!(stderr.contains("Error:"));

    let stderr = run_err(&["decode", "8d0005"]);
    assert!(stderr.contains("Error:"));

    let stderr = run_err(&["decode", "xyz"]);
    assert!(stderr.contains("Invalid hex"));
}

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn test_types_lists_framework_types() {
    let output = run_ok(&["types"]);
    assert!(output.contains("#github.com/sllt/sparrow/gen/Version"));
    assert!(output.contains("#github.com/sllt/sparrow/net/handshake/MessageIntroduce"));
}

#[test]
fn test_types_filter_and_json() {
    let output = run_ok(&["types", "--filter", "HANDSHAKE", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| e["kind"] == "struct"));
}

#[test]
fn test_errors_lists_messages() {
    let output = run_ok(&["errors"]);
    assert!(output.contains("timed out"));
    assert!(output.contains("process terminated"));
}

#[test]
fn test_show_struct() {
    let output = run_ok(&["show", "gen/Compression"]);
    assert!(output.contains("Struct (4 fields):"));
    assert!(output.contains("Type: #github.com/sllt/sparrow/gen/CompressionType"));
}

#[test]
fn test_show_unknown_type() {
    let stderr = run_err(&["show", "gen/Nope"]);
    assert!(stderr.contains("Type not registered"));
}
