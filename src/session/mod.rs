//! Session credentials.
//!
//! # Data Flow
//! ```text
//! cookie value (compact HS256 token)
//!     → codec.rs (verify signature, decode claims, check expiry)
//!     → Session (typed, read-only) or DecodeFailure
//! ```
//!
//! # Design Decisions
//! - The codec is a pure function of (token, now, secret key)
//! - Failure variants exist for logging only; the gateway treats them all
//!   as "no session"
//! - Roles are a closed set; unknown role strings never decode

pub mod codec;
pub mod error;
pub mod types;

pub use codec::SessionCodec;
pub use error::DecodeFailure;
pub use types::{Role, Session};
