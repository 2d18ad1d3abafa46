//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use quote_gateway::config::{GatewayConfig, SecretKey};
use quote_gateway::{AccessGateway, Role, Session, SessionCodec};

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn key() -> SecretKey {
    SecretKey::new(SECRET)
}

pub fn gateway(config: &GatewayConfig) -> Arc<AccessGateway> {
    Arc::new(AccessGateway::from_config(config, &key()).unwrap())
}

/// Seal a token expiring `ttl` from now (negative for already expired).
pub fn mint(role: Role, ttl: Duration) -> String {
    let codec = SessionCodec::new(&key());
    let now = Utc::now();
    codec.encode(&Session {
        subject: "staff-7".into(),
        role,
        issued_at: Some(now - Duration::minutes(1)),
        expires_at: now + ttl,
    })
    .unwrap()
}

pub fn valid_token() -> String {
    mint(Role::Admin, Duration::hours(1))
}

pub fn expired_token() -> String {
    mint(Role::Sales, Duration::seconds(-30))
}

/// Start a mock upstream that answers every request with
/// `upstream saw <METHOD> <target>` and reports any `x-forwarded-for`.
pub async fn start_mock_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        let request_line = head.lines().next().unwrap_or_default();
                        let mut words = request_line.split_whitespace();
                        let method = words.next().unwrap_or("?");
                        let target = words.next().unwrap_or("?");
                        let forwarded = head
                            .lines()
                            .find(|l| l.to_ascii_lowercase().starts_with("x-forwarded-for:"))
                            .map(|l| l.splitn(2, ':').nth(1).unwrap_or_default().trim().to_string())
                            .unwrap_or_default();

                        let body = format!("upstream saw {method} {target}");
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nX-Upstream-Forwarded-For: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            forwarded,
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
