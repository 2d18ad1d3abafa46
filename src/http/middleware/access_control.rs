//! Access Control Middleware.
//! Turns the gateway's decision into a forwarded request or a redirect.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use crate::audit::{AuditSink, AuthFailureEvent};
use crate::gateway::{AccessDecision, AccessGateway, Evaluation};
use crate::observability::metrics;
use crate::session::DecodeFailure;

/// State required for access control.
#[derive(Clone)]
pub struct AccessControlState {
    pub gateway: Arc<AccessGateway>,
    pub cookie_name: Arc<str>,
    pub audit: Option<Arc<dyn AuditSink>>,
    pub record_anonymous: bool,
}

impl AccessControlState {
    pub fn new(gateway: Arc<AccessGateway>, cookie_name: &str) -> Self {
        Self {
            gateway,
            cookie_name: Arc::from(cookie_name),
            audit: None,
            record_anonymous: false,
        }
    }

    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>, record_anonymous: bool) -> Self {
        self.audit = Some(sink);
        self.record_anonymous = record_anonymous;
        self
    }

    fn audit_denial(&self, req: &Request<Body>, evaluation: &Evaluation) {
        let (Some(sink), Some(failure)) = (&self.audit, evaluation.failure()) else {
            return;
        };
        if failure == DecodeFailure::NoCredential && !self.record_anonymous {
            return;
        }

        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        sink.record(AuthFailureEvent::new(req.uri().path(), failure.reason(), request_id));
    }
}

pub async fn access_control_middleware(
    State(state): State<AccessControlState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = session_cookie(req.headers(), &state.cookie_name);
    let evaluation = state
        .gateway
        .evaluate(req.uri().path(), token.as_deref(), Utc::now());
    metrics::record_evaluation(&evaluation);

    if let AccessDecision::RedirectTo(location) = &evaluation.decision {
        if location == state.gateway.login_path() {
            state.audit_denial(&req, &evaluation);
        }
        return Redirect::to(location).into_response();
    }

    // Attach the verified session for handlers behind this layer.
    if let Some(session) = evaluation.into_session() {
        req.extensions_mut().insert(session);
    }
    next.run(req).await
}

/// Find cookie `name` across all `Cookie` headers. Empty values count as absent.
pub fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    #[test]
    fn test_session_cookie_lookup() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; session=abc.def.ghi"));

        assert_eq!(session_cookie(&headers, "session"), Some("abc.def.ghi".to_string()));
        assert_eq!(session_cookie(&headers, "theme"), Some("dark".to_string()));
        assert_eq!(session_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_session_cookie_across_headers_and_quotes() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("session=\"tok\""));

        assert_eq!(session_cookie(&headers, "session"), Some("tok".to_string()));
    }

    #[test]
    fn test_empty_and_prefixed_names() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("session=; my_session=x"));

        assert_eq!(session_cookie(&headers, "session"), None);
        assert_eq!(session_cookie(&HeaderMap::new(), "session"), None);
    }
}
