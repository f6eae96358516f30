// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the downstream Auth service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{
    base_url, read_json, AuthServiceClient, ClientError, MessageResponse, UserStats, UserSummary,
    DOWNSTREAM_TIMEOUT_SECS,
};
use crate::auth::Role;

#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    base: String,
    http: Client,
}

impl HttpAuthClient {
    pub fn new(base: &url::Url) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DOWNSTREAM_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base: base_url(base),
            http,
        })
    }
}

#[async_trait]
impl AuthServiceClient for HttpAuthClient {
    async fn list_users(&self) -> Result<Vec<UserSummary>, ClientError> {
        let url = format!("{}/users/", self.base);
        debug!(%url, "relaying user list to Auth service");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        read_json(response).await
    }

    async fn block_user(&self, user_id: i64) -> Result<MessageResponse, ClientError> {
        let url = format!("{}/users/{user_id}/block", self.base);
        debug!(%url, "relaying block to Auth service");
        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        read_json(response).await
    }

    async fn unblock_user(&self, user_id: i64) -> Result<MessageResponse, ClientError> {
        let url = format!("{}/users/{user_id}/unblock", self.base);
        debug!(%url, "relaying unblock to Auth service");
        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        read_json(response).await
    }

    async fn change_role(
        &self,
        user_id: i64,
        new_role: Role,
    ) -> Result<MessageResponse, ClientError> {
        let url = format!("{}/users/{user_id}/role", self.base);
        debug!(%url, role = %new_role, "relaying role change to Auth service");
        let response = self
            .http
            .patch(&url)
            .query(&[("new_role", new_role.as_str())])
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        read_json(response).await
    }

    async fn user_stats(&self) -> Result<UserStats, ClientError> {
        let url = format!("{}/stats/users", self.base);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        read_json(response).await
    }
}
