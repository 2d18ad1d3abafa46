//! Session decode failures.

/// Why a credential did not yield a session.
///
/// Never shown to callers: every variant ends in the same redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DecodeFailure {
    #[error("no session credential presented")]
    NoCredential,

    /// Encoding, algorithm or signature check failed. Which one is only logged.
    #[error("session credential failed verification")]
    Invalid,

    /// Authentic payload with missing or unrecognized fields.
    #[error("session credential payload is malformed")]
    Malformed,

    #[error("session credential has expired")]
    Expired,
}

impl DecodeFailure {
    /// Stable label for metrics and audit records.
    pub fn reason(&self) -> &'static str {
        match self {
            DecodeFailure::NoCredential => "no_credential",
            DecodeFailure::Invalid => "invalid",
            DecodeFailure::Malformed => "malformed",
            DecodeFailure::Expired => "expired",
        }
    }
}
