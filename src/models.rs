// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Core Domain Models
//!
//! The [`Principal`] is the authenticated identity this service issues
//! tokens for. Moderation state (`is_active`) is authoritative in the
//! downstream Auth service; the copy here backs the token lifecycle only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;

/// A registered identity with a role and status.
///
/// Created on registration and never deleted; blocking flips `is_active`
/// instead (soft state only).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Principal {
    /// Unique identifier.
    pub id: i64,
    /// Unique login name; also the token subject.
    pub username: String,
    /// Contact email, verified via the email-token flow.
    pub email: String,
    /// Role gating access to moderation operations.
    pub role: Role,
    /// Stored password digest (never serialized).
    #[serde(skip)]
    #[schema(ignore)]
    pub hashed_password: String,
    /// False once the principal has been blocked.
    pub is_active: bool,
    /// True once the email-verification link has been followed.
    pub email_verified: bool,
    /// When the principal registered.
    pub created_at: DateTime<Utc>,
}

impl Principal {
    pub fn new(id: i64, username: String, email: String, hashed_password: String) -> Self {
        Self {
            id,
            username,
            email,
            role: Role::default(),
            hashed_password,
            is_active: true,
            email_verified: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_principal_defaults() {
        let p = Principal::new(1, "alice".into(), "alice@example.com".into(), "digest".into());
        assert_eq!(p.role, Role::User);
        assert!(p.is_active);
        assert!(!p.email_verified);
    }

    #[test]
    fn hashed_password_is_not_serialized() {
        let p = Principal::new(1, "alice".into(), "alice@example.com".into(), "digest".into());
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("digest"));
        assert!(json.contains("alice"));
    }
}
