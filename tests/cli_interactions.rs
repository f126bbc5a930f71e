//! Binary-level tests: flags, configuration sources, output modes and exit codes

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const PROBE_VARS: &[&str] = &[
    "PROBE_BASE_URL",
    "PROBE_AUTH_TOKEN",
    "PROBE_DELAY_MS",
    "PROBE_TIMEOUT_SECONDS",
    "PROBE_ENDPOINTS",
    "ENABLE_COLOR",
    "NO_COLOR",
];

/// Command isolated from the caller's environment and any .env file
fn create_test_cmd(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("eprobe").unwrap();
    cmd.current_dir(workdir.path());
    for var in PROBE_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Mock API: operations answers 200 with JSON, equipment rejects with 401
async fn start_mock_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/eqp/operations"))
        .and(header("Authorization", "Bearer cli-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/eqp/equipment"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    server
}

fn mock_args(server: &MockServer) -> Vec<String> {
    vec![
        "--base-url".into(),
        server.uri(),
        "--token".into(),
        "cli-token".into(),
        "--delay-ms".into(),
        "0".into(),
        "--endpoint".into(),
        "GET /api/eqp/operations List operations".into(),
        "--endpoint".into(),
        "GET /api/eqp/equipment List equipment".into(),
    ]
}

#[test]
fn test_help_lists_options() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--fail-on-error"))
        .stdout(predicate::str::contains("--endpoint"));
}

#[test]
fn test_version_output() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_topic() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .args(["--no-color", "--help-topic", "exit-codes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EXIT CODES"));
}

#[test]
fn test_invalid_timeout_rejected() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .args(["--timeout", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than 0"));
}

#[test]
fn test_invalid_base_url_is_config_error() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .args(["--no-color", "--base-url", "ftp://jetty.test"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_conflicting_color_flags() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .args(["--color", "--no-color"])
        .assert()
        .code(1);
}

#[test]
fn test_write_env_example() {
    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .args(["--write-env-example", "example.env"])
        .assert()
        .success();

    let content = fs::read_to_string(workdir.path().join("example.env")).unwrap();
    assert!(content.contains("PROBE_AUTH_TOKEN"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plain_run_reports_each_endpoint() {
    let server = start_mock_api().await;
    let args = mock_args(&server);

    tokio::task::spawn_blocking(move || {
        let workdir = TempDir::new().unwrap();
        create_test_cmd(&workdir)
            .args(&args)
            .arg("--no-color")
            .assert()
            .success()
            .stdout(predicate::str::contains("Testing API endpoints at"))
            .stdout(predicate::str::contains(
                "[PASS] GET /api/eqp/operations - 200 OK - List operations",
            ))
            .stdout(predicate::str::contains("   Response: {\"items\":[]}"))
            .stdout(predicate::str::contains(
                "[FAIL] GET /api/eqp/equipment - 401 Unauthorized - List equipment",
            ))
            .stdout(predicate::str::contains("Testing complete! 1 passed, 1 failed"))
            .stdout(predicate::str::contains("\x1b[").not());
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_colored_run_uses_markers() {
    let server = start_mock_api().await;
    let args = mock_args(&server);

    tokio::task::spawn_blocking(move || {
        let workdir = TempDir::new().unwrap();
        create_test_cmd(&workdir)
            .args(&args)
            .arg("--color")
            .assert()
            .success()
            .stdout(predicate::str::contains("🔍 Testing API endpoints at"))
            .stdout(predicate::str::contains("✅ GET /api/eqp/operations"))
            .stdout(predicate::str::contains("❌ GET /api/eqp/equipment"))
            .stdout(predicate::str::contains("✅ Testing complete!"))
            .stdout(predicate::str::contains("\x1b["));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fail_on_error_sets_exit_code() {
    let server = start_mock_api().await;
    let args = mock_args(&server);

    tokio::task::spawn_blocking(move || {
        let workdir = TempDir::new().unwrap();
        create_test_cmd(&workdir)
            .args(&args)
            .args(["--no-color", "--fail-on-error"])
            .assert()
            .code(6)
            .stderr(predicate::str::contains("1 of 2 endpoints failed"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_report() {
    let server = start_mock_api().await;
    let args = mock_args(&server);

    let output = tokio::task::spawn_blocking(move || {
        let workdir = TempDir::new().unwrap();
        create_test_cmd(&workdir).args(&args).arg("--json").output().unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["state"], "Completed");
    assert_eq!(report["results"][0]["status_code"], 200);
    assert_eq!(report["results"][0]["body"], serde_json::json!({"items": []}));
    assert_eq!(report["results"][1]["status_code"], 401);
    assert_eq!(report["results"][1]["succeeded"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_env_file_supplies_configuration() {
    let server = start_mock_api().await;
    let env_content = format!(
        "PROBE_BASE_URL={}\nPROBE_AUTH_TOKEN=cli-token\nPROBE_DELAY_MS=0\nPROBE_ENDPOINTS=\"GET /api/eqp/operations List operations\"\n",
        server.uri()
    );

    tokio::task::spawn_blocking(move || {
        let workdir = TempDir::new().unwrap();
        fs::write(workdir.path().join(".env"), env_content).unwrap();

        create_test_cmd(&workdir)
            .args(["--no-color", "--fail-on-error"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(1 endpoint)"))
            .stdout(predicate::str::contains("[PASS] GET /api/eqp/operations - 200 OK"));
    })
    .await
    .unwrap();
}

#[test]
fn test_unreachable_service_still_completes() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let workdir = TempDir::new().unwrap();
    create_test_cmd(&workdir)
        .args(["--no-color", "--delay-ms", "0", "--token", "t"])
        .args(["--base-url", &format!("http://{}", addr)])
        .args(["--endpoint", "GET /api/eqp/activities List activities"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[FAIL] GET /api/eqp/activities - ERROR - List activities: "))
        .stdout(predicate::str::contains("Testing complete! 0 passed, 1 failed"));
}
