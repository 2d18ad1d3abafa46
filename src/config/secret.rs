//! Session signing secret.
//!
//! Read once from the environment at startup and passed explicitly to the
//! session codec. Rotating it invalidates every session issued under the
//! previous value.

use std::fmt;
use std::sync::Arc;

use crate::config::loader::ConfigError;

/// Process-wide HMAC key for session tokens. Never printed.
#[derive(Clone)]
pub struct SecretKey(Arc<[u8]>);

impl SecretKey {
    /// Wrap raw key bytes. Length policy is enforced by [`SecretKey::from_value`].
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self(Arc::from(bytes.as_ref()))
    }

    /// Read the key from environment variable `var`.
    pub fn from_env(var: &str, min_len: usize) -> Result<Self, ConfigError> {
        Self::from_value(var, std::env::var(var).ok(), min_len)
    }

    /// Validate a looked-up value; `var` is only used in error messages.
    pub fn from_value(var: &str, value: Option<String>, min_len: usize) -> Result<Self, ConfigError> {
        let value = value.filter(|v| !v.is_empty()).ok_or_else(|| ConfigError::MissingSecret {
            var: var.to_string(),
        })?;

        if value.len() < min_len {
            return Err(ConfigError::WeakSecret {
                var: var.to_string(),
                len: value.len(),
                min: min_len,
            });
        }

        Ok(Self::new(value.as_bytes()))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([redacted; {} bytes])", self.0.len())
    }
}
