// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{AuthService, PasswordHasher, TokenCodec};
use crate::clients::{AuthServiceClient, PostServiceClient};
use crate::config::Config;
use crate::mailer::MailSender;
use crate::store::PrincipalStore;

/// Shared application state.
///
/// Everything here is read-only after startup except the principal store,
/// which sits behind an `RwLock`. Requests share no other mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub codec: TokenCodec,
    pub store: Arc<RwLock<PrincipalStore>>,
    pub auth_service: AuthService,
    pub mailer: Arc<dyn MailSender>,
    pub auth_client: Arc<dyn AuthServiceClient>,
    pub post_client: Arc<dyn PostServiceClient>,
}

impl AppState {
    pub fn new(
        config: Config,
        mailer: Arc<dyn MailSender>,
        auth_client: Arc<dyn AuthServiceClient>,
        post_client: Arc<dyn PostServiceClient>,
    ) -> Result<Self, crate::auth::password::PasswordError> {
        let codec = TokenCodec::new(&config.jwt_secret);
        let store = Arc::new(RwLock::new(PrincipalStore::new()));
        let auth_service = AuthService::new(&config, codec.clone(), store.clone())?;

        Ok(Self {
            config: Arc::new(config),
            codec,
            store,
            auth_service,
            mailer,
            auth_client,
            post_client,
        })
    }

    /// Seed the admin account from the environment, if configured.
    pub async fn seed_admin(&self, username: &str, password: &str) -> Result<(), crate::error::ApiError> {
        let hasher: &PasswordHasher = self.auth_service.hasher();
        let digest = hasher
            .hash(password)
            .map_err(|e| crate::error::ApiError::internal(e.to_string()))?;

        let mut store = self.store.write().await;
        store.insert(
            username.to_string(),
            format!("{username}@localhost"),
            digest,
        )?;
        store.set_role(username, crate::auth::Role::Admin)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::json;
    use tokio::sync::Mutex;

    use crate::auth::Role;
    use crate::clients::{
        ClientError, ContentStats, MessageResponse, UserStats, UserSummary,
    };
    use crate::config::tests::test_config;
    use crate::mailer::MailerError;

    /// Auth client mock that counts calls and answers with the downstream
    /// service's canonical confirmation messages.
    #[derive(Default)]
    pub(crate) struct MockAuthClient {
        pub calls: AtomicUsize,
        pub fail_with: Option<(u16, &'static str)>,
    }

    impl MockAuthClient {
        fn check_failure(&self) -> Result<(), ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((status, detail)) = self.fail_with {
                return Err(ClientError::Upstream {
                    status,
                    detail: detail.to_string(),
                });
            }
            Ok(())
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl crate::clients::AuthServiceClient for MockAuthClient {
        async fn list_users(&self) -> Result<Vec<UserSummary>, ClientError> {
            self.check_failure()?;
            Ok(vec![
                UserSummary {
                    id: 1,
                    username: "alice".to_string(),
                    role: Role::Admin,
                    is_active: true,
                },
                UserSummary {
                    id: 2,
                    username: "bob".to_string(),
                    role: Role::User,
                    is_active: false,
                },
            ])
        }

        async fn block_user(&self, user_id: i64) -> Result<MessageResponse, ClientError> {
            self.check_failure()?;
            Ok(MessageResponse {
                message: format!("User {user_id} blocked"),
            })
        }

        async fn unblock_user(&self, user_id: i64) -> Result<MessageResponse, ClientError> {
            self.check_failure()?;
            Ok(MessageResponse {
                message: format!("User {user_id} unblocked"),
            })
        }

        async fn change_role(
            &self,
            user_id: i64,
            new_role: Role,
        ) -> Result<MessageResponse, ClientError> {
            self.check_failure()?;
            Ok(MessageResponse {
                message: format!("User {user_id} role changed to {new_role}"),
            })
        }

        async fn user_stats(&self) -> Result<UserStats, ClientError> {
            self.check_failure()?;
            Ok(UserStats {
                total_users: 100,
                active_users: 90,
                banned_users: 10,
            })
        }
    }

    /// Post client mock, same shape as [`MockAuthClient`].
    #[derive(Default)]
    pub(crate) struct MockPostClient {
        pub calls: AtomicUsize,
        pub fail_with: Option<(u16, &'static str)>,
    }

    impl MockPostClient {
        fn check_failure(&self) -> Result<(), ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((status, detail)) = self.fail_with {
                return Err(ClientError::Upstream {
                    status,
                    detail: detail.to_string(),
                });
            }
            Ok(())
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl crate::clients::PostServiceClient for MockPostClient {
        async fn delete_post(&self, post_id: i64) -> Result<MessageResponse, ClientError> {
            self.check_failure()?;
            Ok(MessageResponse {
                message: format!("Post {post_id} deleted"),
            })
        }

        async fn delete_comment(&self, comment_id: i64) -> Result<MessageResponse, ClientError> {
            self.check_failure()?;
            Ok(MessageResponse {
                message: format!("Comment {comment_id} deleted"),
            })
        }

        async fn content_stats(&self) -> Result<ContentStats, ClientError> {
            self.check_failure()?;
            Ok(ContentStats {
                total_posts: 200,
                total_comments: 500,
            })
        }
    }

    /// Mailer that records what would have been sent.
    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl MailSender for RecordingMailer {
        async fn send_verification_email(
            &self,
            to_email: &str,
            username: &str,
            token: &str,
        ) -> Result<(), MailerError> {
            self.sent.lock().await.push((
                to_email.to_string(),
                username.to_string(),
                token.to_string(),
            ));
            Ok(())
        }
    }

    pub(crate) struct TestHarness {
        pub state: AppState,
        pub auth_client: Arc<MockAuthClient>,
        pub post_client: Arc<MockPostClient>,
        pub mailer: Arc<RecordingMailer>,
    }

    pub(crate) fn test_harness() -> TestHarness {
        test_harness_with(MockAuthClient::default(), MockPostClient::default())
    }

    pub(crate) fn test_harness_with(
        auth_client: MockAuthClient,
        post_client: MockPostClient,
    ) -> TestHarness {
        let auth_client = Arc::new(auth_client);
        let post_client = Arc::new(post_client);
        let mailer = Arc::new(RecordingMailer::default());

        let state = AppState::new(
            test_config(),
            mailer.clone(),
            auth_client.clone(),
            post_client.clone(),
        )
        .unwrap();

        TestHarness {
            state,
            auth_client,
            post_client,
            mailer,
        }
    }

    pub(crate) fn test_state() -> AppState {
        test_harness().state
    }

    impl AppState {
        /// Issue an access token signed with the test secret.
        pub(crate) fn test_token(&self, username: &str, role: Role) -> String {
            let mut extra = serde_json::Map::new();
            extra.insert("role".to_string(), json!(role.as_str()));
            self.codec
                .issue(username, extra, Duration::minutes(30))
                .unwrap()
        }
    }

    #[tokio::test]
    async fn seed_admin_creates_admin_principal() {
        let state = test_state();
        state.seed_admin("root", "rootpass").await.unwrap();

        let principal = state.store.read().await.find_by_username("root").unwrap();
        assert_eq!(principal.role, Role::Admin);

        // Seeded credentials authenticate.
        assert!(state.auth_service.authenticate("root", "rootpass").await.is_some());
    }
}
