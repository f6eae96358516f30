// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Downstream Service Clients
//!
//! Typed HTTP clients for the services the admin gateway delegates to.
//! Each downstream service is modeled as a trait so handlers depend on the
//! contract, not the transport, and tests substitute recording mocks.
//!
//! The gateway does not retry and does not transform downstream errors:
//! an upstream failure carries the downstream status and detail verbatim.

pub mod auth;
pub mod post;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;

pub use auth::HttpAuthClient;
pub use post::HttpPostClient;

/// Per-request timeout for downstream calls.
pub(crate) const DOWNSTREAM_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The downstream service answered with a non-success status. Status
    /// and detail are relayed to the caller unchanged.
    #[error("upstream returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    /// The downstream service could not be reached.
    #[error("downstream request failed: {0}")]
    Transport(String),

    /// The downstream service answered 2xx with an undecodable body.
    #[error("downstream response was invalid: {0}")]
    InvalidResponse(String),
}

/// One user as reported by the Auth service's admin listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
}

/// Confirmation body returned by moderation operations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

/// User counts from the Auth service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserStats {
    pub total_users: u64,
    pub active_users: u64,
    pub banned_users: u64,
}

/// Post and comment counts from the Post service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ContentStats {
    pub total_posts: u64,
    pub total_comments: u64,
}

/// Moderation operations owned by the Auth service.
#[async_trait]
pub trait AuthServiceClient: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserSummary>, ClientError>;
    async fn block_user(&self, user_id: i64) -> Result<MessageResponse, ClientError>;
    async fn unblock_user(&self, user_id: i64) -> Result<MessageResponse, ClientError>;
    async fn change_role(&self, user_id: i64, new_role: Role)
        -> Result<MessageResponse, ClientError>;
    async fn user_stats(&self) -> Result<UserStats, ClientError>;
}

/// Moderation operations owned by the Post service.
#[async_trait]
pub trait PostServiceClient: Send + Sync {
    async fn delete_post(&self, post_id: i64) -> Result<MessageResponse, ClientError>;
    async fn delete_comment(&self, comment_id: i64) -> Result<MessageResponse, ClientError>;
    async fn content_stats(&self) -> Result<ContentStats, ClientError>;
}

/// Decode a downstream response, relaying non-success bodies as-is.
///
/// Downstream services answer errors as `{"detail": "..."}`; when a body
/// does not match that shape the raw text is relayed instead.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    if !status.is_success() {
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or(body);
        return Err(ClientError::Upstream {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// Base URL normalized to no trailing slash, so paths concatenate cleanly.
pub(crate) fn base_url(url: &url::Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}
