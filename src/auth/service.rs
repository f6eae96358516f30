// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and verification flows.
//!
//! Thin orchestration over the codec, the password hasher and the principal
//! store. Two token profiles share the codec: short-lived access tokens
//! carrying a `role` claim, and longer-lived email tokens carrying
//! `purpose: "email-verification"`.

use std::sync::Arc;

use chrono::Duration;
use serde_json::{json, Map};
use tokio::sync::RwLock;

use super::claims::TokenClaims;
use super::error::AuthError;
use super::password::{PasswordError, PasswordHasher};
use super::token::{TokenCodec, TokenError};
use crate::config::Config;
use crate::models::Principal;
use crate::store::PrincipalStore;

/// Purpose claim value stamped on email verification tokens.
const EMAIL_TOKEN_PURPOSE: &str = "email-verification";

#[derive(Clone)]
pub struct AuthService {
    codec: TokenCodec,
    hasher: PasswordHasher,
    store: Arc<RwLock<PrincipalStore>>,
    access_ttl: Duration,
    email_ttl: Duration,
    /// Digest verified for unknown usernames so both failure paths cost
    /// one hash (prevents username enumeration by timing).
    dummy_digest: String,
}

impl AuthService {
    pub fn new(
        config: &Config,
        codec: TokenCodec,
        store: Arc<RwLock<PrincipalStore>>,
    ) -> Result<Self, PasswordError> {
        let hasher = PasswordHasher::new(config.password_hash_time_cost)?;
        let dummy_digest = hasher.hash("invalid-password-placeholder")?;

        Ok(Self {
            codec,
            hasher,
            store,
            access_ttl: Duration::minutes(config.access_token_expire_minutes),
            email_ttl: Duration::minutes(config.email_token_expire_minutes),
            dummy_digest,
        })
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Check credentials against the store.
    ///
    /// Returns `None` uniformly for unknown usernames and wrong passwords;
    /// callers must treat both as "invalid credentials".
    pub async fn authenticate(&self, username: &str, password: &str) -> Option<Principal> {
        let principal = self.store.read().await.find_by_username(username);

        match principal {
            Some(principal) if self.hasher.verify(password, &principal.hashed_password) => {
                Some(principal)
            }
            Some(_) => None,
            None => {
                let _ = self.hasher.verify(password, &self.dummy_digest);
                None
            }
        }
    }

    /// Issue a short-lived access token carrying the principal's role.
    pub fn create_access_token(&self, principal: &Principal) -> Result<String, TokenError> {
        let mut claims = Map::new();
        claims.insert("role".to_string(), json!(principal.role.as_str()));
        self.codec.issue(&principal.username, claims, self.access_ttl)
    }

    /// Issue a longer-lived token used only in email verification links.
    pub fn create_email_token(&self, principal: &Principal) -> Result<String, TokenError> {
        let mut claims = Map::new();
        claims.insert("purpose".to_string(), json!(EMAIL_TOKEN_PURPOSE));
        self.codec.issue(&principal.username, claims, self.email_ttl)
    }

    /// Verify an email token; any failure (signature, expiry, wrong
    /// profile) surfaces as the single invalid-token error.
    pub fn verify_email_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = self.codec.verify(token)?;
        if claims.purpose() != Some(EMAIL_TOKEN_PURPOSE) {
            return Err(TokenError::Invalid);
        }
        Ok(claims)
    }

    /// Decode a token and load the principal it names.
    pub async fn resolve_principal(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self
            .codec
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)?;

        self.store
            .read()
            .await
            .find_by_username(&claims.sub)
            .ok_or(AuthError::UnknownPrincipal)
    }

    /// Mark the token's subject as email-verified.
    pub async fn confirm_email(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self
            .verify_email_token(token)
            .map_err(|_| AuthError::InvalidToken)?;

        self.store
            .write()
            .await
            .mark_email_verified(&claims.sub)
            .map_err(|_| AuthError::UnknownPrincipal)
    }
}
