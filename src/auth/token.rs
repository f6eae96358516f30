// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed, time-limited token codec.
//!
//! Tokens are HS256 JWTs signed with the shared platform secret. Validity is
//! a pure function of the signature and the current time; nothing is stored
//! server-side. Access and email tokens share this codec and differ only in
//! TTL and claim shape (see [`crate::auth::service`]).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use super::claims::TokenClaims;

/// Claim keys managed by the codec itself; stripped from caller-supplied
/// extras so the encoded JSON never carries duplicate fields.
const RESERVED_CLAIMS: [&str; 2] = ["sub", "exp"];

/// All verification failures collapse into this one kind. Callers must not
/// be able to distinguish a bad signature from an expired token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid or expired token")]
    Invalid,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// HS256 token codec over the shared symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for `subject` with `exp = now + ttl`, merging any extra
    /// claims into the payload.
    pub fn issue(
        &self,
        subject: &str,
        extra: Map<String, Value>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let mut extra = extra;
        for key in RESERVED_CLAIMS {
            extra.remove(key);
        }

        let claims = TokenClaims {
            sub: subject.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            extra,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a token against the current wall clock.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token against an explicit clock.
    ///
    /// The signature check is delegated to `jsonwebtoken`; expiry is checked
    /// here against the supplied timestamp so the boundary is exact: a token
    /// is rejected from `now >= exp` onward, with no leeway.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::Invalid)?;

        if now >= data.claims.exp {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret")
    }

    fn extra_claims() -> Map<String, Value> {
        let mut extra = Map::new();
        extra.insert("role".to_string(), json!("moderator"));
        extra.insert("purpose".to_string(), json!("email-verification"));
        extra
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let codec = codec();
        let token = codec
            .issue("alice", extra_claims(), Duration::minutes(30))
            .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.extra, extra_claims());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = codec()
            .issue("alice", Map::new(), Duration::minutes(30))
            .unwrap();

        let other = TokenCodec::new("different-secret");
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(matches!(
            codec().verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn expiry_boundary_is_exact() {
        let codec = codec();
        let ttl = Duration::minutes(30);
        let token = codec.issue("alice", Map::new(), ttl).unwrap();
        let exp = codec.verify(&token).unwrap().exp;

        // Accepted strictly before expiry.
        assert!(codec.verify_at(&token, exp - 1).is_ok());
        // Rejected at the exact expiry instant and after.
        assert!(codec.verify_at(&token, exp).is_err());
        assert!(codec.verify_at(&token, exp + 1).is_err());
    }

    #[test]
    fn reserved_claims_cannot_be_overridden() {
        let codec = codec();
        let mut extra = Map::new();
        extra.insert("sub".to_string(), json!("mallory"));
        extra.insert("exp".to_string(), json!(0));

        let token = codec.issue("alice", extra, Duration::minutes(5)).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.extra.is_empty());
    }
}
