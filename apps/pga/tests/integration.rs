//! Integration tests for the pga CLI

use httpmock::prelude::*;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const HELLO_MD5: &str = "5d41402abc4b2a76b9719d911017c592";

fn pga() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pga"));
    for var in [
        "PGA_JOBS",
        "PGA_OUTPUT_DIR",
        "PGA_SOURCE_URL",
        "PGA_COLOR",
        "PGA_INDEX",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute pga");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for pga")
}

/// Config file pointing the source at a mock server and the cache at a temp dir
fn write_config(dir: &Path, source_url: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let cache = dir.join("cache");
    std::fs::write(
        &path,
        format!(
            "[source]\nurl = \"{source_url}\"\n\n[paths]\ncache = \"{}\"\n",
            cache.display()
        ),
    )
    .unwrap();
    path
}

fn mirror_with_one_good_file(dir: &Path) -> std::path::PathBuf {
    let local = dir.join("mirror");
    let shard = local.join("siva/latest/ab");
    std::fs::create_dir_all(&shard).unwrap();
    std::fs::write(shard.join("ab12.siva"), b"hello").unwrap();
    local
}

#[test]
fn test_cli_version() {
    let output = pga().arg("--version").output().expect("Failed to execute pga");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pga"));
}

#[test]
fn test_cli_help() {
    let output = pga().arg("--help").output().expect("Failed to execute pga");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("status"));
}

#[test]
fn test_cli_invalid_command() {
    let output = pga()
        .arg("invalid-command")
        .output()
        .expect("Failed to execute pga");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_zero_jobs_rejected() {
    let output = pga()
        .args(["status", "--jobs", "0"])
        .output()
        .expect("Failed to execute pga");

    assert!(!output.status.success());
}

#[test]
fn test_missing_config_file_is_setup_failure() {
    let temp = TempDir::new().unwrap();
    let output = pga()
        .arg("--config")
        .arg(temp.path().join("absent.toml"))
        .args(["status", "-i"])
        .output()
        .expect("Failed to execute pga");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "{stderr}");
}

#[test]
fn test_status_from_stdin() {
    let server = MockServer::start();
    let digest = server.mock(|when, then| {
        when.method(GET).path("/siva/latest/ab/ab12.siva.md5");
        then.status(200).body(format!("{HELLO_MD5}  ab12.siva\n"));
    });

    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), &server.base_url());
    let local = mirror_with_one_good_file(temp.path());

    let mut cmd = pga();
    cmd.arg("--config")
        .arg(&config)
        .args(["--color", "never", "status", "-i", "-j", "2", "-o"])
        .arg(&local);
    let output = run_with_stdin(cmd, "ab12.siva\n\ncd34.siva\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stdout.contains("1 of 2 corrupted in '"), "{stdout}");
    assert!(stderr.contains("getting siva files by name from stdin"));
    assert!(stderr.contains("filter flags will be ignored"));
    assert!(stderr.contains("File is corrupted or not up to date siva/latest/cd/cd34.siva"));
    digest.assert();
}

#[test]
fn test_status_json_output() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/siva/latest/ab/ab12.siva.md5");
        then.status(200).body(HELLO_MD5);
    });

    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), &server.base_url());
    let local = mirror_with_one_good_file(temp.path());

    let mut cmd = pga();
    cmd.arg("--config")
        .arg(&config)
        .args(["--json", "status", "--stdin", "--output"])
        .arg(&local);
    let output = run_with_stdin(cmd, "ab12.siva\n");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("getting siva files"), "{stderr}");

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["type"], "StatusReport");
    assert_eq!(report["data"]["tally"]["total"], 1);
    assert_eq!(report["data"]["tally"]["flagged"], 0);
}
