//! Routing subsystem: path classification for the access gateway.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → path.rs (normalize: slashes, dot segments, unreserved escapes)
//!     → table.rs (exclusion filter, then Protected / Public / Unclassified)
//!     → matcher.rs (segment-prefix and extension conditions)
//!
//! Table compilation (at startup):
//!     RoutesConfig
//!     → Compile matchers
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Table compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: classification is a pure function of the path

pub mod matcher;
pub mod path;
pub mod table;

pub use table::{RouteClass, RouteMatch, RouteTable};
