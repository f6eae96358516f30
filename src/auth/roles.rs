// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Admin` - Full access, including all moderation endpoints
/// - `Moderator` - Elevated user (reserved for future moderation surfaces)
/// - `User` - Normal platform user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Moderator (elevated, non-admin)
    Moderator,
    /// Normal platform user
    User,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            // Admin can do anything
            (Role::Admin, _) => true,
            // Moderator covers moderator and user
            (Role::Moderator, Role::Moderator | Role::User) => true,
            (Role::User, Role::User) => true,
            // Everything else is denied
            _ => false,
        }
    }

    /// Parse role from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "moderator" => Some(Role::Moderator),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }
}

impl Default for Role {
    /// Default role is User (least privilege for authenticated users).
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| InvalidRole(s.to_string()))
    }
}

/// Returned when a role string is not one of `user`, `moderator`, `admin`.
#[derive(Debug, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct InvalidRole(pub String);
