#![allow(clippy::unwrap_used)]
//! End-to-end tests against a mock chat API.
//!
//! The binary is pointed at a wiremock server through `STREAM_BASE_URL`, so
//! these tests check the exact requests each command sends.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::time::Duration;
use stream_cli::client::{ChatService, StreamClient};
use stream_cli::config::Credentials;
use stream_cli::payload::Payload;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "key123";
const API_SECRET: &str = "secret456";

#[allow(deprecated)]
fn stream(config_home: &TempDir, server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("stream").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("NO_COLOR", "1")
        .env("STREAM_API_KEY", API_KEY)
        .env("STREAM_API_SECRET", API_SECRET)
        .env("STREAM_BASE_URL", server.uri())
        .env_remove("STREAM_TIMEOUT_SECS")
        .env_remove("STREAM_LOG");
    cmd
}

fn credentials(server: &MockServer, timeout: Duration) -> Credentials {
    Credentials {
        api_key: API_KEY.to_string(),
        api_secret: API_SECRET.to_string(),
        base_url: server.uri(),
        timeout,
    }
}

fn channel_response(kind: &str, id: &str) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "channel": {"id": id, "type": kind, "cid": format!("{kind}:{id}")},
        "members": [],
        "duration": "3.21ms"
    }))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_channel_init_sends_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/messaging/general/query"))
        .and(query_param("api_key", API_KEY))
        .and(header("stream-auth-type", "jwt"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({
            "data": {
                "name": "General",
                "image": "https://img.example.com/g.png",
                "members": ["alice", "bob"],
                "created_by": {"name": "CLI"}
            },
            "state": false,
            "watch": false,
            "presence": false
        })))
        .respond_with(channel_response("messaging", "general"))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    stream(&home, &server)
        .args([
            "chat:channel:init",
            "-i",
            "general",
            "-t",
            "messaging",
            "-n",
            "General",
            "-u",
            "https://img.example.com/g.png",
            "-m",
            "alice,bob",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The channel General has been initialized!",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_channel_init_data_overrides_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/team/ops/query"))
        .and(body_partial_json(json!({"data": {"name": "X", "topic": "incidents"}})))
        .respond_with(channel_response("team", "ops"))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    stream(&home, &server)
        .args([
            "chat:channel:init",
            "-i",
            "ops",
            "-t",
            "team",
            "-n",
            "Ops",
            "-d",
            r#"{"name":"X","topic":"incidents"}"#,
        ])
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_channel_init_malformed_data_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(channel_response("team", "ops"))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    stream(&home, &server)
        .args(["chat:channel:init", "-t", "team", "-n", "Ops", "-d", "{"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid JSON in --data"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_channel_init_remote_rejection_exits_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 4,
            "message": "channel type \"gaming\" does not exist",
            "StatusCode": 400
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    stream(&home, &server)
        .args(["chat:channel:init", "-t", "gaming", "-n", "Arena"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist (code 4)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_webhook_sends_one_update() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/app"))
        .and(query_param("api_key", API_KEY))
        .and(body_json(json!({"webhook_url": "https://example.com/push"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"duration": "1.2ms"})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    stream(&home, &server)
        .args([
            "chat:settings:push",
            "--enable",
            "--type",
            "webhook",
            "--webhook_url",
            "https://example.com/push",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Push notifications have been enabled for Webhooks.",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_disable_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/app"))
        .and(body_json(json!({"firebase_config": {"disabled": true}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"duration": "0.9ms"})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = stream(&home, &server)
        .args(["chat:settings:push", "-d", "-t", "firebase", "-j"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["duration"], "0.9ms");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_unreadable_cert_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    stream(&home, &server)
        .args([
            "chat:settings:push",
            "-e",
            "-t",
            "apn",
            "-b",
            "/nonexistent/cert.p12",
        ])
        .assert()
        .code(1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_channel_init_rejects_reserved_characters_in_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(channel_response("team", "ops"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    for id in ["../../app", "foo#bar", "a?b=c"] {
        stream(&home, &server)
            .args(["chat:channel:init", "-i", id, "-t", "team", "-n", "Ops"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid --id"));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_trace_logging_hides_provider_secrets() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/app"))
        .and(body_json(json!({"firebase_config": {"api_key": "FIREBASE-SECRET-KEY"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"duration": "1.0ms"})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = stream(&home, &server)
        .args([
            "chat:settings:push",
            "-vv",
            "-e",
            "-t",
            "firebase",
            "-f",
            "FIREBASE-SECRET-KEY",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Request body"), "trace output missing: {stderr}");
    assert!(!stderr.contains("FIREBASE-SECRET-KEY"));
    assert!(!stderr.contains(API_SECRET));
    assert!(!stderr.contains('\x1b'), "escape codes in log output: {stderr:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_json_output_is_plain_json() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/app"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"duration": "2.0ms"})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = stream(&home, &server)
        .args(["chat:settings:push", "-d", "-t", "webhook", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("Updating app settings"));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["duration"], "2.0ms");
}

#[tokio::test]
async fn test_client_maps_unauthorized_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 5,
            "message": "api secret is invalid"
        })))
        .mount(&server)
        .await;

    let client = StreamClient::new(&credentials(&server, Duration::from_secs(5))).unwrap();
    let err = client.update_app_settings(Payload::new()).await.unwrap_err();

    assert_eq!(err.kind(), "AuthError");
    assert!(err.to_string().contains("api secret is invalid"));
}

#[tokio::test]
async fn test_client_maps_slow_response_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"channel": {"id": "x"}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = StreamClient::new(&credentials(&server, Duration::from_secs(1))).unwrap();
    let err = client
        .create_channel("messaging", "x", Payload::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "TimeoutError");
}

#[tokio::test]
async fn test_client_returns_created_channel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/livestream/launch/query"))
        .respond_with(channel_response("livestream", "launch"))
        .expect(1)
        .mount(&server)
        .await;

    let client = StreamClient::new(&credentials(&server, Duration::from_secs(5))).unwrap();
    let channel = client
        .create_channel("livestream", "launch", Payload::new())
        .await
        .unwrap();

    assert_eq!(channel.cid, "livestream:launch");
    assert_eq!(channel.kind, "livestream");
}
