//! Runs the `buddy-ds` binary against a mocked API

use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fresh directory standing in for the user's home and config dirs
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("buddy-ds-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

fn find_file(dir: &Path, name: &str) -> Option<PathBuf> {
    for entry in std::fs::read_dir(dir).ok()?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_file(&path, name) {
                return Some(found);
            }
        } else if path.file_name().is_some_and(|n| n == name) {
            return Some(path);
        }
    }
    None
}

async fn run(home: &Path, api_url: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_buddy-ds"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("BUDDY_API_URL", api_url)
        .env("BUDDY_TOKEN", "test-token")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("run buddy-ds")
}

#[tokio::test]
async fn test_types_lists_every_data_source() {
    let home = scratch_dir("types");

    let output = run(&home, "http://127.0.0.1:1", &["types"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 30);
    assert!(stdout.lines().any(|line| line == "buddy_variable_ssh_key"));
}

#[tokio::test]
async fn test_failed_read_exits_nonzero_and_keeps_the_log() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces/acme/projects/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let home = scratch_dir("read");
    let config = home.join("project.json");
    std::fs::write(&config, json!({"domain": "acme", "name": "ghost"}).to_string()).expect("config file");

    let output = run(
        &home,
        &server.uri(),
        &["--log-level", "debug", "read", "buddy_project", "--config", config.to_str().expect("utf-8 path")],
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("project not found"));

    let log = find_file(&home, "buddy-ds.log").expect("log file");
    let log = std::fs::read_to_string(log).expect("read log");
    assert!(log.contains("project not found"), "log was not flushed:\n{}", log);
}
