// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated caller representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::roles::Role;

/// Payload of a platform token.
///
/// `sub` and `exp` are managed by the codec; everything else the issuer put
/// in the token survives in `extra` unchanged (access tokens carry `role`,
/// email tokens carry `purpose`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the principal's username.
    pub sub: String,

    /// Expiration timestamp (Unix seconds).
    pub exp: i64,

    /// Issuer-supplied claims, round-tripped verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// Read the role claim, if present and well-formed.
    pub fn role(&self) -> Option<Role> {
        self.extra
            .get("role")
            .and_then(Value::as_str)
            .and_then(Role::parse)
    }

    /// Read the purpose claim (set on email verification tokens).
    pub fn purpose(&self) -> Option<&str> {
        self.extra.get("purpose").and_then(Value::as_str)
    }
}

/// Authenticated caller extracted from a verified token.
///
/// This is the primary type handlers use to represent whoever is making the
/// request. The role comes from the token's verified `role` claim only;
/// there is no header-based fallback.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// The principal's username (token `sub` claim).
    pub username: String,

    /// Role asserted by the verified token.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Build from verified token claims. A token without a usable role
    /// claim authenticates as a plain user.
    pub fn from_claims(claims: &TokenClaims) -> Self {
        Self {
            username: claims.sub.clone(),
            role: claims.role().unwrap_or_default(),
        }
    }

    /// Check if the caller has at least the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    /// Check if this caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_claims(role: &str) -> TokenClaims {
        let mut extra = Map::new();
        extra.insert("role".to_string(), json!(role));
        TokenClaims {
            sub: "alice".to_string(),
            exp: 1_700_003_600,
            extra,
        }
    }

    #[test]
    fn from_claims_extracts_username_and_role() {
        let user = AuthenticatedUser::from_claims(&sample_claims("admin"));
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_admin());
    }

    #[test]
    fn missing_role_claim_defaults_to_user() {
        let claims = TokenClaims {
            sub: "bob".to_string(),
            exp: 0,
            extra: Map::new(),
        };
        let user = AuthenticatedUser::from_claims(&claims);
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn malformed_role_claim_defaults_to_user() {
        let user = AuthenticatedUser::from_claims(&sample_claims("superuser"));
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn purpose_claim_is_readable() {
        let mut extra = Map::new();
        extra.insert("purpose".to_string(), json!("email-verification"));
        let claims = TokenClaims {
            sub: "carol".to_string(),
            exp: 0,
            extra,
        };
        assert_eq!(claims.purpose(), Some("email-verification"));
    }
}
