//! Session token codec.
//!
//! Tokens are compact HS256 JWTs. Claims carry `sub` (or `userId`), `role`,
//! `iat` and `exp` in Unix seconds.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecretKey;
use crate::session::error::DecodeFailure;
use crate::session::types::{Role, Session};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(alias = "userId")]
    sub: Option<String>,
    role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
    exp: Option<i64>,
}

/// Verifies and decodes session tokens with the process-wide key.
#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(key: &SecretKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock, strictly and without leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(key.expose()),
            decoding: DecodingKey::from_secret(key.expose()),
            validation,
        }
    }

    /// Decode `token` into a session valid at `now`.
    ///
    /// An absent or empty token fails with `NoCredential` before any
    /// cryptographic work. The header and signature are checked before the
    /// claims are read.
    pub fn decode(&self, token: Option<&str>, now: DateTime<Utc>) -> Result<Session, DecodeFailure> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(DecodeFailure::NoCredential),
        };

        // Header problems are verification failures, never payload ones.
        jsonwebtoken::decode_header(token).map_err(|e| invalid(e.kind()))?;

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::Json(_) => malformed("claims are not a valid object"),
                kind => invalid(kind),
            })?
            .claims;

        let subject = claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing subject"))?;
        let role = claims
            .role
            .filter(Role::is_recognized)
            .ok_or_else(|| malformed("missing or unrecognized role"))?;
        let expires_at = claims
            .exp
            .and_then(from_unix)
            .ok_or_else(|| malformed("missing or out of range expiry"))?;
        let issued_at = match claims.iat {
            Some(secs) => Some(from_unix(secs).ok_or_else(|| malformed("out of range issued-at"))?),
            None => None,
        };

        let session = Session {
            subject,
            role,
            issued_at,
            expires_at,
        };

        if !session.is_live_at(now) {
            tracing::debug!(expires_at = %session.expires_at, "session token expired");
            return Err(DecodeFailure::Expired);
        }

        Ok(session)
    }

    /// Seal a session into a token this codec will accept.
    ///
    /// Used by operator tooling and tests; issuing sessions to users is the
    /// application's job.
    pub fn encode(&self, session: &Session) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            sub: Some(session.subject.clone()),
            role: Some(session.role),
            iat: session.issued_at.map(|t| t.timestamp()),
            exp: Some(session.expires_at.timestamp()),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn invalid(kind: &ErrorKind) -> DecodeFailure {
    tracing::debug!(reason = ?kind, "session token failed verification");
    DecodeFailure::Invalid
}

fn malformed(reason: &'static str) -> DecodeFailure {
    tracing::debug!(reason, "session token payload malformed");
    DecodeFailure::Malformed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    const KEY: &str = "test-secret-key-that-is-long-enough-0123";

    fn codec() -> SessionCodec {
        SessionCodec::new(&SecretKey::new(KEY))
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            subject: "user-42".into(),
            role: Role::Admin,
            issued_at: Some(now() - Duration::hours(1)),
            expires_at,
        }
    }

    /// Sign arbitrary claims with the test key.
    fn sign(header: Header, claims: &serde_json::Value) -> String {
        jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(KEY.as_bytes())).unwrap()
    }

    #[test]
    fn test_absent_token() {
        let codec = codec();
        assert_eq!(codec.decode(None, now()), Err(DecodeFailure::NoCredential));
        assert_eq!(codec.decode(Some(""), now()), Err(DecodeFailure::NoCredential));
    }

    #[test]
    fn test_valid_token_decodes() {
        let codec = codec();
        let original = session(now() + Duration::hours(8));
        let token = codec.encode(&original).unwrap();

        let decoded = codec.decode(Some(&token), now()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();

        let at_now = codec.encode(&session(now())).unwrap();
        assert_eq!(codec.decode(Some(&at_now), now()), Err(DecodeFailure::Expired));

        let past = codec.encode(&session(now() - Duration::seconds(1))).unwrap();
        assert_eq!(codec.decode(Some(&past), now()), Err(DecodeFailure::Expired));

        let next_second = codec.encode(&session(now() + Duration::seconds(1))).unwrap();
        assert!(codec.decode(Some(&next_second), now()).is_ok());
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let other = SessionCodec::new(&SecretKey::new("another-secret-key-also-long-enough-999"));
        let token = other.encode(&session(now() + Duration::hours(1))).unwrap();

        assert_eq!(codec().decode(Some(&token), now()), Err(DecodeFailure::Invalid));
    }

    #[test]
    fn test_tampered_claims_are_invalid() {
        let codec = codec();
        let mine = codec.encode(&session(now() + Duration::hours(1))).unwrap();
        let mut other = session(now() + Duration::days(365));
        other.subject = "someone-else".into();
        let theirs = codec.encode(&other).unwrap();

        let mine: Vec<&str> = mine.split('.').collect();
        let theirs: Vec<&str> = theirs.split('.').collect();
        let forged = format!("{}.{}.{}", mine[0], theirs[1], mine[2]);

        assert_eq!(codec.decode(Some(&forged), now()), Err(DecodeFailure::Invalid));
    }

    #[test]
    fn test_structurally_broken_tokens_are_invalid() {
        let codec = codec();
        for token in ["garbage", "a.b", "a.b.c.d", "a.b.!!!", "..."] {
            assert_eq!(
                codec.decode(Some(token), now()),
                Err(DecodeFailure::Invalid),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_unexpected_algorithm_is_invalid() {
        let codec = codec();
        let claims = json!({"sub": "u", "role": "ADMIN", "exp": 4102444800i64});

        let hs512 = sign(Header::new(Algorithm::HS512), &claims);
        assert_eq!(codec.decode(Some(&hs512), now()), Err(DecodeFailure::Invalid));

        // {"alg":"none","typ":"JWT"}
        let signed = sign(Header::new(Algorithm::HS256), &claims);
        let parts: Vec<&str> = signed.split('.').collect();
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", parts[1]);
        assert_eq!(codec.decode(Some(&unsigned), now()), Err(DecodeFailure::Invalid));
    }

    #[test]
    fn test_malformed_payloads() {
        let codec = codec();
        let cases = [
            json!({"sub": "u", "role": "SUPERUSER", "exp": 4102444800i64}),
            json!({"sub": "u", "role": "ADMIN"}),
            json!({"role": "ADMIN", "exp": 4102444800i64}),
            json!({"sub": "u", "exp": 4102444800i64}),
            json!({"sub": "u", "role": "ADMIN", "exp": "tomorrow"}),
            json!("not an object"),
        ];
        for claims in cases {
            let token = sign(Header::new(Algorithm::HS256), &claims);
            assert_eq!(
                codec.decode(Some(&token), now()),
                Err(DecodeFailure::Malformed),
                "claims {claims}"
            );
        }
    }

    #[test]
    fn test_user_id_alias_and_missing_iat() {
        let codec = codec();
        let token = sign(
            Header::new(Algorithm::HS256),
            &json!({"userId": "u7", "role": "Sales", "exp": 4102444800i64}),
        );

        let session = codec.decode(Some(&token), now()).unwrap();
        assert_eq!(session.subject, "u7");
        assert_eq!(session.role, Role::Sales);
        assert_eq!(session.issued_at, None);
    }
}
