//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout, concurrency limit)
//!     → middleware/access_control.rs (session cookie → gateway → decision)
//!         RedirectTo → 303 with Location
//!         Forward    → server.rs proxy handler → upstream application
//! ```

pub mod middleware;
pub mod server;

pub use middleware::AccessControlState;
pub use server::HttpServer;
