#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Runs the `staffdesk` binary against a canned local HTTP server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

/// Serve `responses` in order, one connection each, and hand back the request lines.
fn serve(responses: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let mut request_lines = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().unwrap();
            let request = read_head(&mut socket);
            request_lines.push(request.lines().next().unwrap_or_default().to_string());

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).unwrap();
        }
        request_lines
    });

    (format!("http://{addr}/api/"), handle)
}

/// Requests sent by `list` and `delete` carry no body.
fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    while !String::from_utf8_lossy(&buf).contains("\r\n\r\n") {
        let n = socket.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn staffdesk(base_url: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_staffdesk"))
        .args(args)
        .args(["--base-url", base_url, "--config", "/nonexistent/staffdesk.toml"])
        .env("STAFFDESK_TOKEN", "token-123")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn list_prints_json_lines() {
    let (base, server) = serve(vec![(
        "200 OK",
        r#"{"items":[{"id":1,"name":"Central"},{"id":2,"name":"Norte","city":"Natal"}],"total":2}"#
            .to_string(),
    )]);

    let output = staffdesk(&base, &["list", "hospitals", "--filter", "city=Natal"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["name"], "Central");
    assert!(String::from_utf8_lossy(&output.stderr).contains("page 1 of 1"));

    let requests = server.join().unwrap();
    assert!(requests[0].starts_with("GET /api/hospitals?limit=20&offset=0&city=Natal"));
}

#[test]
fn expired_session_exits_with_hint() {
    let (base, server) = serve(vec![(
        "401 Unauthorized",
        r#"{"detail":"Token expired"}"#.to_string(),
    )]);

    let output = staffdesk(&base, &["list", "professionals"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Your session has expired"));
    assert!(stderr.contains("hint: sign in again"));
    server.join().unwrap();
}

#[test]
fn delete_explicit_ids_then_reload() {
    let (base, server) = serve(vec![
        ("204 No Content", String::new()),
        ("204 No Content", String::new()),
        ("200 OK", r#"{"items":[],"total":0}"#.to_string()),
    ]);

    let output = staffdesk(&base, &["delete", "accounts", "--id", "4", "--id", "9"]);

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_str(String::from_utf8(output.stdout).unwrap().trim()).unwrap();
    assert_eq!(report["requested"], 2);
    assert_eq!(report["deleted"], serde_json::json!([4, 9]));

    let mut requests = server.join().unwrap();
    let reload = requests.pop().unwrap();
    requests.sort();
    assert_eq!(
        requests,
        vec![
            "DELETE /api/accounts/4 HTTP/1.1".to_string(),
            "DELETE /api/accounts/9 HTTP/1.1".to_string(),
        ]
    );
    assert!(reload.starts_with("GET /api/accounts?limit=20&offset=0"));
}
