//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors collected)
//!     → GatewayConfig (validated, immutable)
//!
//! environment
//!     → secret.rs (session signing key, required)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any error here is fatal: the gateway never serves with a bad config

pub mod loader;
pub mod schema;
pub mod secret;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AuditConfig, GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, RoutesConfig,
    SessionConfig, TimeoutConfig, UpstreamConfig,
};
pub use secret::SecretKey;
pub use validation::{validate_config, validate_routes, ValidationError};
