#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! `HttpTransport` against a canned local HTTP server.

use serde_json::json;
use staffdesk_transport::{
    FailureClass, Filters, HttpTransport, HttpTransportConfig, ListQuery, Transport,
    TransportError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One canned response: status line suffix (e.g. `"200 OK"`) and body.
type Canned = (&'static str, &'static str);

/// Serve `responses` in order, one connection each, and hand back the raw requests.
async fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        requests
    });

    (format!("http://{addr}/api/"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn transport(base_url: &str) -> HttpTransport {
    let mut config = HttpTransportConfig::new(base_url);
    config.bearer_token = Some("token-123".to_string());
    config.tenant = Some("north-clinic".to_string());
    config.max_retries = 0;
    HttpTransport::new(&config).unwrap()
}

#[tokio::test]
async fn list_sends_window_filters_and_auth() {
    let (base, server) = serve(vec![(
        "200 OK",
        r#"{"items":[{"id":1,"name":"St. Mary"}],"total":41}"#,
    )])
    .await;

    let mut filters = Filters::new();
    filters.insert("city".to_string(), "Porto".to_string());
    let page = transport(&base)
        .list("hospitals", &ListQuery::new(20, 40, filters))
        .await
        .unwrap();

    assert_eq!(page.total, 41);
    assert_eq!(page.items[0]["name"], "St. Mary");

    let requests = server.await.unwrap();
    let request = requests[0].to_lowercase();
    assert!(request.starts_with("get /api/hospitals?limit=20&offset=40&city=porto"));
    assert!(request.contains("authorization: bearer token-123"));
    assert!(request.contains("x-tenant-id: north-clinic"));
}

#[tokio::test]
async fn create_posts_json_body() {
    let (base, server) = serve(vec![("201 Created", r#"{"id":9,"name":"Ana"}"#)]).await;

    let created = transport(&base)
        .create("professionals", json!({"name": "Ana"}))
        .await
        .unwrap();
    assert_eq!(created["id"], 9);

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /api/professionals "));
    assert!(requests[0].ends_with(r#"{"name":"Ana"}"#));
}

#[tokio::test]
async fn update_puts_to_record_path() {
    let (base, server) = serve(vec![("200 OK", r#"{"id":3,"name":"Bea"}"#)]).await;

    transport(&base)
        .update("professionals", 3, json!({"name": "Bea"}))
        .await
        .unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("PUT /api/professionals/3 "));
}

#[tokio::test]
async fn delete_no_content_is_success() {
    let (base, server) = serve(vec![("204 No Content", "")]).await;

    transport(&base).delete("memberships", 12).await.unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("DELETE /api/memberships/12 "));
}

#[tokio::test]
async fn unauthorized_is_classified_as_session_expired() {
    let (base, _server) = serve(vec![("401 Unauthorized", r#"{"detail":"Token expired"}"#)]).await;

    let err = transport(&base)
        .list("hospitals", &ListQuery::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        TransportError::Unauthorized {
            message: Some("Token expired".to_string())
        }
    );
    assert_eq!(err.classify(), FailureClass::Unauthorized);
}

#[tokio::test]
async fn backend_message_is_surfaced() {
    let (base, _server) = serve(vec![(
        "422 Unprocessable Entity",
        r#"{"message":"Email already registered"}"#,
    )])
    .await;

    let err = transport(&base)
        .create("accounts", json!({"email": "a@b.c"}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "Email already registered");
}

#[tokio::test]
async fn missing_message_falls_back_to_status() {
    let (base, _server) = serve(vec![("500 Internal Server Error", "oops")]).await;

    let err = transport(&base).delete("hospitals", 1).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error 500");
}

#[tokio::test]
async fn gateway_error_is_retried() {
    let (base, server) = serve(vec![
        ("503 Service Unavailable", ""),
        ("200 OK", r#"{"items":[],"total":0}"#),
    ])
    .await;

    let mut config = HttpTransportConfig::new(&base);
    config.max_retries = 1;
    let page = HttpTransport::new(&config)
        .unwrap()
        .list("hospitals", &ListQuery::default())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = transport(&format!("http://{addr}/"))
        .list("hospitals", &ListQuery::default())
        .await
        .unwrap_err();
    assert!(err.is_connectivity(), "unexpected error: {err:?}");
}
