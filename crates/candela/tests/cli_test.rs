//! Integration tests for the `candela` CLI binary.
//!
//! Argument parsing and error handling run without a backend; the
//! backend-bound commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `candela` binary with env isolation.
///
/// Clears `CANDELA_*` env vars and points config directories at a temp
/// dir so tests never touch the user's real configuration.
fn candela_cmd(home: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("candela");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    for key in [
        "CANDELA_BACKEND_URL",
        "CANDELA_DEFAULT_DEVICE_ID",
        "CANDELA_MODE",
        "CANDELA_POLL_INTERVAL_MS",
        "CANDELA_COMMAND_INTERVAL_MS",
        "CANDELA_TIMEOUT_SECS",
        "CANDELA_OUTPUT",
        "CANDELA_INSECURE",
        "CANDELA_CA_CERT",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

fn write_config(home: &tempfile::TempDir, body: &str) {
    let dir = home.path().join("candela");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), body).unwrap();
}

fn device(id: &str, connected: bool) -> serde_json::Value {
    json!({
        "id": id,
        "connected": connected,
        "program": "cop",
        "random": false,
        "speed": 20,
        "direction": "up",
        "color": "#112233",
        "last_seen": "2025-10-16T10:30:00"
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = candela_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("candlestick")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("send"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("candela"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_empty_send_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home)
        .args(["send", "--backend", "http://127.0.0.1:9"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--program"));
}

#[test]
fn test_speed_out_of_range_is_rejected_by_parser() {
    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home)
        .args(["send", "--speed", "41"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_mode_in_config_file_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    write_config(&home, "mode = \"mesh\"\n");

    candela_cmd(&home)
        .arg("devices")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("mode"));
}

#[test]
fn test_backend_flag_overrides_invalid_file_value() {
    let home = tempfile::tempdir().unwrap();
    write_config(&home, "backend_url = \"not a url\"\n");

    candela_cmd(&home)
        .args(["devices", "--backend", "http://127.0.0.1:9", "--timeout", "2"])
        .assert()
        .code(7);
}

#[test]
fn test_unreachable_backend_is_a_connection_error() {
    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home)
        .args(["devices", "--backend", "http://127.0.0.1:9", "--timeout", "2"])
        .assert()
        .code(7);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home).args(["config", "init"]).assert().success();
    candela_cmd(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    candela_cmd(&home)
        .args(["config", "show", "--device", "porch"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("backend_url = \"http://localhost:8000\"")
                .and(predicate::str::contains("default_device_id = \"porch\"")),
        );
}

#[test]
fn test_env_overrides_config_file() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        &home,
        "backend_url = \"http://file.lan:8000\"\nmode = \"registry\"\n",
    );

    candela_cmd(&home)
        .env("CANDELA_BACKEND_URL", "http://env.lan:9000")
        .env("CANDELA_MODE", "legacy")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("backend_url = \"http://env.lan:9000\"")
                .and(predicate::str::contains("mode = \"legacy\"")),
        );
}

// ── Backend-bound commands ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_lists_registry_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candlesticks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candlesticks": [device("hall", false), device("porch", true)]
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = candela_cmd(&home)
        .args(["devices", "--output", "json", "--backend", &server.uri()])
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["id"], "hall");
    assert_eq!(listed[1]["program"], "cop");
    assert_eq!(listed[1]["color"], "#112233");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_unknown_device_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candlesticks/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "not found" })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home)
        .args(["get", "ghost", "--backend", &server.uri()])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("ghost"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_send_posts_command_to_selected_device() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/candlesticks/porch/command"))
        .and(body_json(json!({ "program": "rb", "speed": 12, "color": "#ff0000" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Command sent to porch"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home)
        .args([
            "send",
            "--device",
            "porch",
            "--program",
            "rainbow",
            "--speed",
            "12",
            "--color",
            "#FF0000",
            "--backend",
            &server.uri(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Command sent to porch"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_reports_connected_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "service": "candlestick-backend",
            "connected_candlesticks": 3
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home)
        .args(["health", "--backend", &server.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("healthy").and(predicate::str::contains("3")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_env_backend_is_used_for_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candlesticks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candlesticks": [device("attic", true)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    write_config(&home, "backend_url = \"http://127.0.0.1:9\"\n");

    candela_cmd(&home)
        .env("CANDELA_BACKEND_URL", server.uri())
        .args(["devices", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("attic"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hung_backend_exits_with_timeout_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candlesticks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "candlesticks": [] }))
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    candela_cmd(&home)
        .args(["devices", "--timeout", "1", "--backend", &server.uri()])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("timed out"));
}
