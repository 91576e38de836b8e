use std::fs;
use std::path::Path;

use assert_cmd::Command;
use files_relay::exitcode;
use files_relay::logging::{ERROR_LOG_FILE, LOG_FILE};
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::{tempdir, TempDir};

/// Writes a config file into `dir` pointing at the given issuer and files API.
fn write_config(dir: &Path, issuer_url: &str, root_url: &str) -> std::path::PathBuf {
    let config = json!({
        "logging": { "directory": dir.join("logs") },
        "oauthWrapRequest": {
            "url": issuer_url,
            "creds": { "uid": "svc-upload", "pwd": "s3cret" },
            "wrapScope": "files-api"
        },
        "filesApi": { "rootUrl": root_url, "timeoutSecs": 5 },
        "fileFormat": "txt"
    });
    let path = dir.join("config.json");
    fs::write(&path, config.to_string()).expect("write config");
    path
}

/// Config whose endpoints are never reachable; used where no network call may happen.
fn offline_config() -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9/wrap", "http://127.0.0.1:9/api");
    (dir, config)
}

fn files_relay(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("files-relay").expect("binary exists");
    cmd.current_dir(workdir)
        .env_remove("FILES_RELAY_PWD")
        .env_remove("FILES_RELAY_CONFIG")
        .env("RUST_LOG", "info,files_relay=debug,files_relay_core=debug");
    cmd
}

#[test]
fn unknown_operation_exits_with_usage_code() {
    let (dir, config) = offline_config();

    files_relay(dir.path())
        .args(["query", "--operation", "bogus", "--fileId", "F-42", "--config"])
        .arg(&config)
        .assert()
        .code(i32::from(exitcode::USAGE))
        .stderr(predicate::str::contains("OperationError"));
}

#[test]
fn missing_file_id_exits_with_usage_code() {
    let (dir, config) = offline_config();

    files_relay(dir.path())
        .args(["query", "--operation", "records", "--config"])
        .arg(&config)
        .assert()
        .code(i32::from(exitcode::USAGE));
}

#[test]
fn missing_input_file_exits_with_noinput_code() {
    let (dir, config) = offline_config();

    files_relay(dir.path())
        .arg("upload")
        .arg(dir.path().join("missing.txt"))
        .arg("--config")
        .arg(&config)
        .assert()
        .code(i32::from(exitcode::NOINPUT))
        .stderr(predicate::str::contains("validating"));
}

#[test]
fn unreadable_config_exits_with_config_code() {
    let dir = tempdir().unwrap();

    files_relay(dir.path())
        .args(["upload", "input.txt", "--config", "nope.json"])
        .assert()
        .code(i32::from(exitcode::CONFIG));
}

#[test]
fn upload_prints_response_and_writes_logs_without_secrets() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/wrap");
        then.status(200).body("wrap_access_token=tok-777&wrap_access_token_expires_in=60");
    });
    let upload = server.mock(|when, then| {
        when.method(POST)
            .path("/api/files")
            .header("authorization", "WRAP access_token=\"tok-777\"")
            .body("A,B,C");
        then.status(200).json_body(json!({"fileId": "F-42", "status": "received"}));
    });

    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &server.url("/wrap"), &server.url("/api"));
    let input = dir.path().join("input.txt");
    fs::write(&input, "A,B,C").unwrap();

    files_relay(dir.path())
        .arg("upload")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(i32::from(exitcode::OK))
        .stdout(predicate::str::contains("F-42"));

    upload.assert();
    let log = fs::read_to_string(dir.path().join("logs").join(LOG_FILE)).unwrap();
    assert!(log.contains("transfer succeeded"), "log: {log}");
    assert!(log.contains("authorization acquired"), "log: {log}");
    assert!(!log.contains("tok-777"), "credential leaked into log: {log}");
    assert!(!log.contains("s3cret"), "password leaked into log: {log}");
}

#[test]
fn rejected_credentials_exit_with_noperm_and_reach_error_log() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/wrap");
        then.status(401).body("Error=1");
    });

    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &server.url("/wrap"), &server.url("/api"));

    files_relay(dir.path())
        .args(["query", "--operation", "summary", "--file-id", "F-42", "--config"])
        .arg(&config)
        .assert()
        .code(i32::from(exitcode::NOPERM))
        .stderr(predicate::str::contains("AuthError"));

    let errors = fs::read_to_string(dir.path().join("logs").join(ERROR_LOG_FILE)).unwrap();
    assert!(errors.contains("acquiring-credential"), "error log: {errors}");
    assert!(!errors.contains("DEBUG") && !errors.contains(" INFO "), "error log: {errors}");
}

#[test]
fn password_override_notice_reaches_log_file() {
    let (dir, config) = offline_config();

    files_relay(dir.path())
        .env("FILES_RELAY_PWD", "env-secret")
        .args(["query", "--operation", "bogus", "--fileId", "F-42", "--config"])
        .arg(&config)
        .assert()
        .code(i32::from(exitcode::USAGE));

    let log = fs::read_to_string(dir.path().join("logs").join(LOG_FILE)).unwrap();
    assert!(
        log.contains("FILES_RELAY_PWD found in env, overriding creds.pwd"),
        "log: {log}"
    );
    assert!(!log.contains("env-secret"), "password leaked into log: {log}");
}
