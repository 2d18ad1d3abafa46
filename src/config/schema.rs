//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the access gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The application requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Route classification table.
    pub routes: RoutesConfig,

    /// Session cookie and signing key settings.
    pub session: SessionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Authentication failure auditing.
    pub audit: AuditConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Upstream application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream authority (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Path classification for the access gateway.
///
/// Entries match on segment boundaries: `/quotes` covers `/quotes` and
/// `/quotes/42`, never `/quotesheet`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Where unauthenticated callers are sent.
    pub login_path: String,

    /// Where authenticated callers are sent away from public pages.
    pub home_path: String,

    /// Path prefixes that require a valid session.
    pub protected: Vec<String>,

    /// Path prefixes meant only for anonymous callers.
    pub public: Vec<String>,

    /// Prefixes skipped entirely (API routes, framework assets).
    ///
    /// This is a scope filter, not a security boundary: API routes
    /// authorize their own requests.
    pub excluded_prefixes: Vec<String>,

    /// File extensions skipped entirely (static assets).
    pub excluded_extensions: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            protected: [
                "/dashboard",
                "/quotes",
                "/airports",
                "/airlines",
                "/audit-logs",
                "/users",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            public: vec!["/login".to_string()],
            excluded_prefixes: ["/api", "/_next/static", "/_next/image", "/favicon.ico"]
                .into_iter()
                .map(String::from)
                .collect(),
            excluded_extensions: [
                "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "css", "js", "map", "woff",
                "woff2", "txt",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Session credential settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token.
    pub cookie_name: String,

    /// Environment variable holding the signing secret.
    pub secret_env: String,

    /// Minimum accepted secret length in bytes.
    pub min_secret_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            secret_env: "SESSION_SECRET".to_string(),
            min_secret_len: 32,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty for development, JSON for log shipping.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Authentication failure auditing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable the audit sink.
    pub enabled: bool,

    /// Capacity of the audit channel; events beyond it are dropped.
    pub buffer: usize,

    /// Also record denials where no credential was presented at all.
    pub record_anonymous: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            buffer: 1024,
            record_anonymous: false,
        }
    }
}
