//! Tests for the `plainfetch` binary: output streams and exit status.

mod helpers;

use tokio::process::Command;

use helpers::{response_with_length, serve_once};

fn plainfetch() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_plainfetch"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[tokio::test]
async fn test_success_prints_text_and_exits_zero() {
    let server = serve_once(response_with_length(
        "HTTP/1.1 200 OK",
        &["Content-Type: text/html"],
        b"<html><body><p>hello</p> from <b>cli</b></body></html>",
    ))
    .await;

    let output = plainfetch().arg(server.url("/")).output().await.unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "hello from cli\n");
}

#[tokio::test]
async fn test_malformed_url_exits_one_with_kind_on_stderr() {
    let output = plainfetch().arg("not a url").output().await.unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("plainfetch error [MalformedURL]"), "stderr: {stderr}");
}

#[tokio::test]
async fn test_unknown_encoding_exits_one() {
    let server = serve_once(response_with_length(
        "HTTP/1.1 200 OK",
        &["Content-Encoding: compress"],
        b"xx",
    ))
    .await;

    let output = plainfetch().arg(server.url("/")).output().await.unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[UnsupportedEncoding]"), "stderr: {stderr}");
}

#[tokio::test]
async fn test_extra_arguments_are_rejected() {
    let output = plainfetch()
        .args(["http://a.example/", "http://b.example/"])
        .output()
        .await
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
