//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Protected and public route sets must be disjoint
//! - Login and home paths must not produce redirect loops
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::uri::Authority;

use crate::config::schema::{GatewayConfig, RoutesConfig};
use crate::routing::matcher::{Matcher, SegmentPrefixMatcher};
use crate::routing::path::canonical;
use crate::routing::RouteTable;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: path {path:?} must start with '/'")]
    NotAbsolute { field: &'static str, path: String },

    #[error("route {protected:?} is protected but overlaps public route {public:?}")]
    Overlap { protected: String, public: String },

    #[error("login path {login:?} is covered by protected route {entry:?}")]
    LoginProtected { login: String, entry: String },

    #[error("login path {login:?} is excluded from classification")]
    LoginExcluded { login: String },

    #[error("protected route {entry:?} is excluded from classification")]
    ProtectedExcluded { entry: String },

    #[error("home path {home:?} is covered by public route {entry:?}")]
    HomeIsPublic { home: String, entry: String },

    #[error("home path and login path are both {path:?}")]
    HomeIsLogin { path: String },

    #[error("session cookie name must be a non-empty token, got {name:?}")]
    InvalidCookieName { name: String },

    #[error("{field}: {value:?} is not a valid address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    collect_route_errors(&config.routes, &mut errors);
    validate_session(config, &mut errors);
    validate_addresses(config, &mut errors);

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero {
            field: "listener.max_connections",
        });
    }
    if config.audit.enabled && config.audit.buffer == 0 {
        errors.push(ValidationError::Zero {
            field: "audit.buffer",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate only the route table: disjoint sets, no redirect loops.
pub fn validate_routes(routes: &RoutesConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    collect_route_errors(routes, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_route_errors(routes: &RoutesConfig, errors: &mut Vec<ValidationError>) {
    let absolute = [("routes.login_path", &routes.login_path), ("routes.home_path", &routes.home_path)]
        .into_iter()
        .chain(routes.protected.iter().map(|p| ("routes.protected", p)))
        .chain(routes.public.iter().map(|p| ("routes.public", p)))
        .chain(routes.excluded_prefixes.iter().map(|p| ("routes.excluded_prefixes", p)));
    for (field, path) in absolute {
        if !path.starts_with('/') {
            errors.push(ValidationError::NotAbsolute {
                field,
                path: path.clone(),
            });
        }
    }

    for protected in &routes.protected {
        let protected_matcher = SegmentPrefixMatcher::new(protected.as_str());
        for public in &routes.public {
            if protected_matcher.overlaps(&SegmentPrefixMatcher::new(public.as_str())) {
                errors.push(ValidationError::Overlap {
                    protected: protected.clone(),
                    public: public.clone(),
                });
            }
        }
        if protected_matcher.matches(&routes.login_path) {
            errors.push(ValidationError::LoginProtected {
                login: routes.login_path.clone(),
                entry: protected.clone(),
            });
        }
    }

    for public in &routes.public {
        if SegmentPrefixMatcher::new(public.as_str()).matches(&routes.home_path) {
            errors.push(ValidationError::HomeIsPublic {
                home: routes.home_path.clone(),
                entry: public.clone(),
            });
        }
    }

    if canonical(&routes.home_path) == canonical(&routes.login_path) {
        errors.push(ValidationError::HomeIsLogin {
            path: routes.home_path.clone(),
        });
    }

    let table = RouteTable::from_config(routes);
    if table.is_excluded(&routes.login_path) {
        errors.push(ValidationError::LoginExcluded {
            login: routes.login_path.clone(),
        });
    }
    for protected in &routes.protected {
        if table.is_excluded(protected) {
            errors.push(ValidationError::ProtectedExcluded {
                entry: protected.clone(),
            });
        }
    }
}

fn validate_session(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    let name = &config.session.cookie_name;
    let is_token = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b));
    if !is_token {
        errors.push(ValidationError::InvalidCookieName { name: name.clone() });
    }
    if config.session.min_secret_len == 0 {
        errors.push(ValidationError::Zero {
            field: "session.min_secret_len",
        });
    }
}

fn validate_addresses(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.upstream.address.parse::<Authority>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "upstream.address",
            value: config.upstream.address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
}
