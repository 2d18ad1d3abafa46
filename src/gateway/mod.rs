//! Access gateway: one routing decision per request.
//!
//! # Data Flow
//! ```text
//! (path, optional token, now)
//!     → routing::path (normalize)
//!     → routing::RouteTable (excluded? else Protected / Public / Unclassified)
//!     → session::SessionCodec (decode; every failure narrows to "no session")
//!     → decision.rs (Forward | RedirectTo)
//! ```
//!
//! # Design Decisions
//! - Pure function of its inputs: no state between requests, no locks
//! - The reason a credential failed never influences the decision
//! - Misconfiguration is rejected before an `AccessGateway` exists

pub mod decision;

pub use decision::{AccessDecision, AccessGateway, Evaluation};
