// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the downstream Post service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{
    base_url, read_json, ClientError, ContentStats, MessageResponse, PostServiceClient,
    DOWNSTREAM_TIMEOUT_SECS,
};

#[derive(Debug, Clone)]
pub struct HttpPostClient {
    base: String,
    http: Client,
}

impl HttpPostClient {
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
impl PostServiceClient for HttpPostClient {
    async fn delete_post(&self, post_id: i64) -> Result<MessageResponse, ClientError> {
        let url = format!("{}/posts/{post_id}", self.base);
        debug!(%url, "relaying post deletion to Post service");
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        read_json(response).await
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<MessageResponse, ClientError> {
        let url = format!("{}/comments/{comment_id}", self.base);
        debug!(%url, "relaying comment deletion to Post service");
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        read_json(response).await
    }

    async fn content_stats(&self) -> Result<ContentStats, ClientError> {
        let url = format!("{}/stats/posts", self.base);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        read_json(response).await
    }
}
