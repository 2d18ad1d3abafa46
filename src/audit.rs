//! Authentication failure auditing.
//!
//! Best effort only: a sink never blocks the request and never changes the
//! access decision. A full or closed channel drops the event.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::observability::metrics;

/// One denied request that presented (or lacked) a credential.
#[derive(Debug, Clone, Serialize)]
pub struct AuthFailureEvent {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub path: String,
    pub reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AuthFailureEvent {
    pub fn new(path: impl Into<String>, reason: &'static str, request_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            path: path.into(),
            reason,
            request_id,
        }
    }
}

/// Destination for authentication failure records.
pub trait AuditSink: Send + Sync {
    /// Must return promptly; errors are swallowed by the implementation.
    fn record(&self, event: AuthFailureEvent);
}

/// Writes each event as a structured log line on the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuthFailureEvent) {
        tracing::warn!(
            target: "audit",
            id = %event.id,
            path = %event.path,
            reason = event.reason,
            request_id = event.request_id.as_deref().unwrap_or("-"),
            "authentication failure"
        );
    }
}

/// Hands events to a background task over a bounded channel.
#[derive(Debug, Clone)]
pub struct ChannelAuditSink {
    tx: mpsc::Sender<AuthFailureEvent>,
}

impl ChannelAuditSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<AuthFailureEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl AuditSink for ChannelAuditSink {
    fn record(&self, event: AuthFailureEvent) {
        if let Err(e) = self.tx.try_send(event) {
            metrics::record_audit_dropped();
            tracing::debug!(error = %e, "audit event dropped");
        }
    }
}

/// Drain `rx` into `sink` until every sender is gone.
pub fn spawn_audit_writer<S>(mut rx: mpsc::Receiver<AuthFailureEvent>, sink: S) -> JoinHandle<()>
where
    S: AuditSink + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            sink.record(event);
        }
        tracing::debug!("audit writer stopped");
    })
}
