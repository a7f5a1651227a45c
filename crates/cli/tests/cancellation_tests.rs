//! Integration tests for graceful Ctrl+C/SIGINT handling.
//!
//! These tests are Unix-only because they send SIGINT to child process.
//! We assert:
//! - exit code is 130
//! - stderr contains cancellation message
//! - no write is issued after the signal

#![cfg(unix)]

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTION: &str = "/rest/routing/bgp/template";
const BASIC_AUTH: &str = "Basic YWRtaW46dGVzdC1wdw==";

fn routeros_cli_bin() -> &'static std::path::Path {
    assert_cmd::cargo::cargo_bin!("routeros-cli")
}

fn send_sigint(pid: u32) {
    // SAFETY: standard Unix kill syscall
    unsafe {
        libc::kill(pid as i32, libc::SIGINT);
    }
}

fn spawn_cli(server: &MockServer, args: &[&str]) -> tokio::process::Child {
    tokio::process::Command::new(routeros_cli_bin())
        .env("DOTENV_DISABLED", "1")
        .env("ROUTEROS_BASE_URL", server.uri())
        .env("ROUTEROS_USERNAME", "admin")
        .env("ROUTEROS_PASSWORD", "test-pw")
        .env("ROUTEROS_MAX_RETRIES", "0")
        .env_remove("ROUTEROS_PROFILE")
        .env_remove("ROUTEROS_CONFIG_PATH")
        .env_remove("ROUTEROS_OPERATION_TIMEOUT")
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn routeros-cli")
}

/// Mount a GET for `*2` that signals when it is hit and then stalls.
async fn mount_stalled_read(server: &MockServer) -> Arc<Notify> {
    let request_seen = Arc::new(Notify::new());
    let request_seen_clone = Arc::clone(&request_seen);

    Mock::given(method("GET"))
        .and(path(format!("{COLLECTION}/*2")))
        .and(header("Authorization", BASIC_AUTH))
        .respond_with(move |_req: &wiremock::Request| {
            request_seen_clone.notify_one();
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(60))
                .set_body_json(serde_json::json!({ ".id": "*2", "name": "temp1", "as": "65531" }))
        })
        .mount(server)
        .await;

    request_seen
}

async fn interrupt(child: tokio::process::Child, request_seen: Arc<Notify>) -> std::process::Output {
    let pid = child.id().expect("child pid");
    tokio::time::timeout(Duration::from_secs(5), request_seen.notified())
        .await
        .expect("expected device request before SIGINT");
    send_sigint(pid);

    tokio::time::timeout(Duration::from_secs(5), child.wait_with_output())
        .await
        .expect("process should exit promptly")
        .expect("wait_with_output ok")
}

#[tokio::test]
async fn test_read_ctrl_c_exits_130_with_message() {
    let server = MockServer::start().await;
    let request_seen = mount_stalled_read(&server).await;

    let child = spawn_cli(&server, &["read", "bgp_template", "*2", "-o", "json"]);
    let output = interrupt(child, request_seen).await;

    assert_eq!(output.status.code(), Some(130));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Operation cancelled by user"));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_update_ctrl_c_before_write_sends_no_patch() {
    let server = MockServer::start().await;
    let request_seen = mount_stalled_read(&server).await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let child = spawn_cli(
        &server,
        &["update", "bgp_template", "*2", "--set", "multihop=yes"],
    );
    let output = interrupt(child, request_seen).await;

    assert_eq!(output.status.code(), Some(130));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Operation cancelled by user"));
}
