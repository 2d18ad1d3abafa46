//! Quote Desk access gateway library.
//!
//! Sits in front of the quote management application, decides per request
//! whether to forward it, send the caller to the login page, or send an
//! already signed-in caller away from the login page.

pub mod audit;
pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod session;

pub use config::schema::GatewayConfig;
pub use gateway::{AccessDecision, AccessGateway};
pub use http::HttpServer;
pub use session::{Role, Session, SessionCodec};
