// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory principal store backing the token lifecycle.
//!
//! The authoritative user database lives in the downstream Auth service;
//! this store holds the principals this instance registered so credential
//! authentication and subject resolution work without a round trip.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::models::Principal;

#[derive(Default)]
pub struct PrincipalStore {
    principals: HashMap<i64, Principal>,
    by_username: HashMap<String, i64>,
    next_id: i64,
}

impl PrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new principal, assigning the next id.
    ///
    /// Fails with 409 if the username is already taken.
    pub fn insert(
        &mut self,
        username: String,
        email: String,
        hashed_password: String,
    ) -> Result<Principal, ApiError> {
        if self.by_username.contains_key(&username) {
            return Err(ApiError::conflict("Username already registered"));
        }

        self.next_id += 1;
        let principal = Principal::new(self.next_id, username, email, hashed_password);
        self.by_username
            .insert(principal.username.clone(), principal.id);
        self.principals.insert(principal.id, principal.clone());
        Ok(principal)
    }

    pub fn find_by_username(&self, username: &str) -> Option<Principal> {
        self.by_username
            .get(username)
            .and_then(|id| self.principals.get(id))
            .cloned()
    }

    /// Flip the verified flag once the email link has been followed.
    pub fn mark_email_verified(&mut self, username: &str) -> Result<Principal, ApiError> {
        let id = self.by_username.get(username).copied();
        let principal = id
            .and_then(|id| self.principals.get_mut(&id))
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        principal.email_verified = true;
        Ok(principal.clone())
    }

    /// Overwrite a principal's role. Used when seeding the admin account.
    pub fn set_role(&mut self, username: &str, role: crate::auth::Role) -> Result<(), ApiError> {
        let id = self.by_username.get(username).copied();
        let principal = id
            .and_then(|id| self.principals.get_mut(&id))
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        principal.role = role;
        Ok(())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.principals.len()
    }
}
