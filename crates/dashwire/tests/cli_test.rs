//! Integration tests for the `dashwire` CLI binary.
//!
//! Offline commands (help, completions, widgets, mock, validate --file) run
//! directly; commands that fetch run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NO_CONFIG: &str = "/tmp/dashwire-cli-test-nonexistent/config.toml";

/// Build a [`Command`] for the `dashwire` binary with env isolation.
///
/// Clears all `DASHWIRE_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn dashwire_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("dashwire");
    cmd.env("HOME", "/tmp/dashwire-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/dashwire-cli-test-nonexistent")
        .env("DASHWIRE_CONFIG", NO_CONFIG)
        .env("NO_COLOR", "1")
        .env_remove("DASHWIRE_PROFILE")
        .env_remove("DASHWIRE_BASE_URL")
        .env_remove("DASHWIRE_TOKEN")
        .env_remove("DASHWIRE_OUTPUT")
        .env_remove("DASHWIRE_INSECURE")
        .env_remove("DASHWIRE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run a command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn widget_path(id: &str) -> String {
    format!("/api/dashboard/widgets/{id}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = dashwire_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    dashwire_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("widgets")
            .and(predicate::str::contains("fetch"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("validate")),
    );
}

#[test]
fn test_version_flag() {
    dashwire_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dashwire"));
}

#[test]
fn test_completions_zsh() {
    dashwire_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    dashwire_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_fetch_without_backend_is_a_usage_error() {
    dashwire_cmd()
        .args(["fetch", "notes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No backend configured"));
}

#[test]
fn test_unknown_profile_lists_available() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[profiles.lab]\nbase_url = \"http://127.0.0.1:9\"\n").unwrap();

    dashwire_cmd()
        .env("DASHWIRE_CONFIG", &config)
        .args(["--profile", "prod", "fetch", "notes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("prod").and(predicate::str::contains("lab")));
}

#[test]
fn test_invalid_strategy_is_rejected() {
    let output = dashwire_cmd()
        .args(["fetch", "notes", "--strategy", "sometimes"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("cache-first"));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_widgets_plain_lists_builtin_ids() {
    let output = dashwire_cmd()
        .args(["--output", "plain", "widgets"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let ids: Vec<&str> = stdout.lines().collect();
    assert_eq!(ids.len(), 12);
    assert!(ids.contains(&"research-progress"));
    assert!(ids.contains(&"time-tracker"));
}

#[test]
fn test_widgets_json_reports_effective_profiles() {
    let output = dashwire_cmd()
        .args(["-o", "json", "widgets"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let widgets = stdout_json(&output);
    let collab = widgets
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["widgetId"] == "collaboration")
        .unwrap();
    assert_eq!(collab["strategy"], "network-first");
    assert_eq!(collab["ttlMs"], 120_000);
    assert_eq!(collab["timeoutMs"], 8_000);
}

#[test]
fn test_mock_prints_builtin_payload() {
    let output = dashwire_cmd()
        .args(["-o", "json", "mock", "quick-stats"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["totalPapers"], 156);
}

#[test]
fn test_mock_unknown_widget_is_empty_object() {
    let output = dashwire_cmd()
        .args(["-o", "json-compact", "mock", "no-such-widget"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "{}");
}

#[test]
fn test_validate_file_accepts_valid_payload() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"papersRead": 3, "researchAccuracy": 90}"#)
        .unwrap();

    dashwire_cmd()
        .args(["validate", "research-progress", "--file"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("research-progress: valid"));
}

#[test]
fn test_validate_stdin_rejects_invalid_payload() {
    dashwire_cmd()
        .args(["-o", "plain", "validate", "research-progress", "--file", "-"])
        .write_stdin(r#"{"researchAccuracy": 150}"#)
        .assert()
        .code(9)
        .stdout(predicate::str::contains("researchAccuracy: must be between 0 and 100"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_override() {
    dashwire_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(NO_CONFIG));
}

#[test]
fn test_config_show_no_config() {
    dashwire_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_show_masks_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "[profiles.lab]\nbase_url = \"https://dash.example.com\"\ntoken = \"s3cret\"\n",
    )
    .unwrap();

    dashwire_cmd()
        .env("DASHWIRE_CONFIG", &config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****").and(predicate::str::contains("s3cret").not()));
}

// ── Fetching against a live backend ─────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_reports_api_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(widget_path("notes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalNotes": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = dashwire_cmd();
    cmd.args(["--base-url", &server.uri(), "-o", "json", "fetch", "notes"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let results = stdout_json(&output);
    assert_eq!(results[0]["widgetId"], "notes");
    assert_eq!(results[0]["source"], "api");
    assert_eq!(results[0]["isValid"], true);
    assert_eq!(results[0]["data"]["totalNotes"], 7);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_falls_back_to_mock_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut cmd = dashwire_cmd();
    cmd.args(["--base-url", &server.uri(), "-o", "json", "fetch", "quick-stats", "calendar"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let results = stdout_json(&output);
    assert_eq!(results[0]["widgetId"], "quick-stats");
    assert_eq!(results[0]["source"], "mock");
    assert_eq!(results[0]["data"]["totalPapers"], 156);
    assert_eq!(results[1]["widgetId"], "calendar");
    assert_eq!(results[1]["source"], "mock");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_cache_only_never_calls_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = dashwire_cmd();
    cmd.args([
        "--base-url",
        &server.uri(),
        "-o",
        "plain",
        "fetch",
        "notes",
        "--strategy",
        "cache-only",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "notes\tmock\ttrue"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_profile_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/widgets/notes"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": { "pinnedNotes": 1 } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "default_profile = \"lab\"\n\n[profiles.lab]\nbase_url = \"{}\"\ntoken = \"s3cret\"\n\
             envelope = \"success-data\"\npath_prefix = \"v2/widgets\"\n",
            server.uri()
        ),
    )
    .unwrap();

    let mut cmd = dashwire_cmd();
    cmd.env("DASHWIRE_CONFIG", &config)
        .args(["-o", "json", "fetch", "notes"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let results = stdout_json(&output);
    assert_eq!(results[0]["source"], "api");
    assert_eq!(results[0]["data"]["pinnedNotes"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_prints_each_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(widget_path("trends")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "period": "week" })))
        .expect(3)
        .mount(&server)
        .await;

    let mut cmd = dashwire_cmd();
    cmd.args([
        "--base-url",
        &server.uri(),
        "-o",
        "json-compact",
        "watch",
        "trends",
        "--interval",
        "10ms",
        "--count",
        "3",
        "--strategy",
        "network-only",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let updates: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(updates.len(), 3);
    assert!(updates.iter().all(|u| u["source"] == "api"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_validate_live_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(widget_path("research-progress")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "researchAccuracy": 150 })),
        )
        .mount(&server)
        .await;

    let mut cmd = dashwire_cmd();
    cmd.args(["--base-url", &server.uri(), "validate", "research-progress"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(9), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("must be between 0 and 100"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_validate_live_reports_unreachable_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut cmd = dashwire_cmd();
    cmd.args(["--base-url", &server.uri(), "validate", "notes"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Could not fetch 'notes'"));
}
