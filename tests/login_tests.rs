// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use rust_decimal::Decimal;

use finally::api::{ApiClient, INVALID_TOKEN_MESSAGE};
use finally::auth::AuthGate;
use finally::error::ClientError;
use finally::models::{Credentials, Registration};
use finally::session::{MemorySessionStore, SessionStore};

const TOKEN: &str = "abcdefghijklmnop";

/// One-shot HTTP server on loopback. Answers a single request with
/// `status` and `body`, and hands back the request as lowercase text.
fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let reason = match status {
            200 => "OK",
            403 => "Forbidden",
            _ => "Error",
        };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request.to_lowercase()
    });
    (base, handle)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let body_len = text[..end]
                .lines()
                .find_map(|l| {
                    l.to_ascii_lowercase()
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap())
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return text;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn alice() -> Credentials {
    Credentials {
        username: "alice".into(),
        password: "secret1".into(),
    }
}

#[tokio::test]
async fn login_stores_trimmed_token_and_username() {
    let (base, server) = serve_once(200, "  abcdefghijklmnop\n");
    let client = ApiClient::new(base, AuthGate::new(MemorySessionStore::new())).unwrap();

    let token = client.login(&alice()).await.unwrap();
    assert_eq!(token, TOKEN);
    assert_eq!(client.gate().store().token().as_deref(), Some(TOKEN));
    assert_eq!(client.gate().store().username().as_deref(), Some("alice"));
    assert!(client.gate().is_authenticated());

    let request = server.join().unwrap();
    assert!(request.starts_with("post /api/auth/login "));
    assert!(request.contains("content-type: application/json"));
    assert!(request.contains(r#""username":"alice""#));
    assert!(!request.contains("authorization:"));
}

#[tokio::test]
async fn short_login_token_is_rejected_with_its_own_message() {
    let (base, server) = serve_once(200, "short");
    let client = ApiClient::new(base, AuthGate::new(MemorySessionStore::new())).unwrap();

    let err = client.login(&alice()).await.unwrap_err();
    assert_eq!(err.user_message(), INVALID_TOKEN_MESSAGE);
    assert_eq!(err.user_message(), "Invalid token received from server");
    assert!(!err.is_unauthorized());
    assert!(client.gate().store().token().is_none());
    assert!(client.gate().store().username().is_none());
    server.join().unwrap();
}

#[tokio::test]
async fn forbidden_login_means_invalid_credentials() {
    let (base, server) = serve_once(403, "");
    let client = ApiClient::new(base, AuthGate::new(MemorySessionStore::new())).unwrap();

    let err = client.login(&alice()).await.unwrap_err();
    assert!(matches!(err, ClientError::RequestFailed { status: 403, .. }));
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(client.gate().store().token().is_none());
    server.join().unwrap();
}

#[tokio::test]
async fn forbidden_registration_leaves_the_session_alone() {
    let (base, server) = serve_once(403, "");
    let store = MemorySessionStore::new();
    store.set_session(TOKEN, "bob").unwrap();
    let client = ApiClient::new(base, AuthGate::new(store)).unwrap();

    let reg = Registration {
        username: "carol".into(),
        email: "carol@example.com".into(),
        password: "secret1".into(),
    };
    let err = client.register(&reg).await.unwrap_err();
    assert!(!err.is_unauthorized());
    assert!(matches!(err, ClientError::RequestFailed { status: 403, .. }));
    assert_eq!(client.gate().store().token().as_deref(), Some(TOKEN));

    let request = server.join().unwrap();
    assert!(request.starts_with("post /api/auth/register "));
}

#[tokio::test]
async fn budget_request_carries_the_bearer_token() {
    let (base, server) = serve_once(200, r#"{"limitAmount":100,"spentAmount":40}"#);
    let gate = AuthGate::new(MemorySessionStore::with_token(TOKEN));
    let client = ApiClient::new(base, gate).unwrap();

    let budget = client.budget("2025-08").await.unwrap();
    assert_eq!(budget.month, "2025-08");
    assert_eq!(budget.limit_amount, Decimal::from(100));
    assert_eq!(budget.remaining(), Decimal::from(60));

    let request = server.join().unwrap();
    assert!(request.starts_with("get /api/budget/?month=2025-08 "));
    assert!(request.contains("authorization: bearer abcdefghijklmnop"));
    assert!(request.contains("content-type: application/json"));
}

#[tokio::test]
async fn forbidden_response_is_unauthorized_and_left_to_the_caller() {
    let (base, server) = serve_once(403, r#"{"message":"expired"}"#);
    let gate = AuthGate::new(MemorySessionStore::with_token(TOKEN));
    let client = ApiClient::new(base, gate).unwrap();

    let err = client.expenses("2025-08").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    // clearing the session belongs to handle_unauthorized, not the client
    assert_eq!(client.gate().store().token().as_deref(), Some(TOKEN));

    let request = server.join().unwrap();
    assert!(request.starts_with("get /api/expenses?month=2025-08 "));
}
