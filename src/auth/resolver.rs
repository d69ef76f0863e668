//! Identity Resolver
//!
//! Verifies HS256 bearer credentials against a shared secret and extracts the
//! caller's identity from the first subject claim that is present.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::UserId;

/// Claims that may carry the caller identity, highest priority first.
pub const SUBJECT_CLAIMS: [&str; 2] = ["user_id", "sub"];

/// Verifies credentials and resolves them to a [`UserId`].
#[derive(Clone)]
pub struct IdentityResolver {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityResolver {
    /// Creates a resolver for tokens signed with `secret`.
    pub fn new(secret: &str) -> Self {
        // `exp` stays in the required claims: tokens must expire
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No audience is configured for these tokens
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Resolves a raw credential to the caller identity.
    ///
    /// Returns `None` when the credential is expired, malformed, badly signed
    /// or carries none of the [`SUBJECT_CLAIMS`]. The reason is logged.
    pub fn resolve(&self, credential: &str) -> Option<UserId> {
        let claims = match decode::<Map<String, Value>>(
            credential,
            &self.decoding_key,
            &self.validation,
        ) {
            Ok(data) => data.claims,
            Err(e) => {
                warn!(reason = %e, "credential verification failed");
                return None;
            }
        };

        let subject = SUBJECT_CLAIMS
            .iter()
            .find_map(|name| claims.get(*name).and_then(claim_as_identity));

        if subject.is_none() {
            warn!("credential carries no subject claim");
        }
        subject
    }
}

/// A claim identifies the caller only if it is a non-empty string or a number.
fn claim_as_identity(value: &Value) -> Option<UserId> {
    match value {
        Value::String(s) if !s.is_empty() => Some(UserId::new(s.as_str())),
        Value::Number(n) => Some(UserId::new(n.to_string())),
        _ => None,
    }
}

/// Extracts the token from an `Authorization` header value of the form
/// `Bearer <token>`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn sign(claims: Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_resolves_sub_claim() {
        let resolver = IdentityResolver::new(SECRET);
        let token = sign(json!({"sub": "user123", "exp": in_one_hour()}), SECRET);

        assert_eq!(resolver.resolve(&token), Some(UserId::new("user123")));
    }

    #[test]
    fn test_user_id_claim_takes_priority() {
        let resolver = IdentityResolver::new(SECRET);
        let token = sign(
            json!({"user_id": "custom", "sub": "standard", "exp": in_one_hour()}),
            SECRET,
        );

        assert_eq!(resolver.resolve(&token), Some(UserId::new("custom")));
    }

    #[test]
    fn test_empty_user_id_falls_back_to_sub() {
        let resolver = IdentityResolver::new(SECRET);
        let token = sign(
            json!({"user_id": "", "sub": "standard", "exp": in_one_hour()}),
            SECRET,
        );

        assert_eq!(resolver.resolve(&token), Some(UserId::new("standard")));
    }

    #[test]
    fn test_numeric_user_id() {
        let resolver = IdentityResolver::new(SECRET);
        let token = sign(json!({"user_id": 42, "exp": in_one_hour()}), SECRET);

        assert_eq!(resolver.resolve(&token), Some(UserId::new("42")));
    }

    #[test]
    fn test_missing_subject_is_invalid() {
        let resolver = IdentityResolver::new(SECRET);
        let token = sign(json!({"name": "nobody", "exp": in_one_hour()}), SECRET);

        assert!(resolver.resolve(&token).is_none());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let resolver = IdentityResolver::new(SECRET);
        let expired = Utc::now().timestamp() - 3600;
        let token = sign(json!({"sub": "user123", "exp": expired}), SECRET);

        assert!(resolver.resolve(&token).is_none());
    }

    #[test]
    fn test_token_without_expiry_is_invalid() {
        let resolver = IdentityResolver::new(SECRET);
        let token = sign(json!({"sub": "user123"}), SECRET);

        assert!(resolver.resolve(&token).is_none());
    }

    #[test]
    fn test_bad_signature_is_invalid() {
        let resolver = IdentityResolver::new(SECRET);
        let token = sign(json!({"sub": "user123", "exp": in_one_hour()}), "other");

        assert!(resolver.resolve(&token).is_none());
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let resolver = IdentityResolver::new(SECRET);
        assert!(resolver.resolve("not.a.jwt").is_none());
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer  abc"), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
    }
}
