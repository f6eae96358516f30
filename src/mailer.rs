// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verification email delivery over SMTP.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Message},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use tracing::info;

use crate::config::Config;

/// Email dispatch behind a trait so tests substitute a recording mock,
/// mirroring the downstream client traits.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send_verification_email(
        &self,
        to_email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("SMTP transport setup failed: {0}")]
    Setup(String),

    #[error("failed to build email message: {0}")]
    Message(String),

    #[error("failed to send email: {0}")]
    Send(String),
}

/// Async SMTP mailer. Credentials are mandatory at startup; a gateway
/// without them refuses to boot (see [`crate::config::Config::from_env`]).
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    public_base_url: String,
}

impl Mailer {
    pub fn new(config: &Config) -> Result<Self, MailerError> {
        let creds = Credentials::new(config.smtp_user.clone(), config.smtp_password.clone());

        // STARTTLS on the submission port, matching the platform's relay.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailerError::Setup(e.to_string()))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from_address: config.smtp_user.clone(),
            public_base_url: config.public_base_url.as_str().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MailSender for Mailer {
    /// Send the registration verification email carrying an email token.
    async fn send_verification_email(
        &self,
        to_email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        let verification_url = format!("{}/auth/verify-email?token={}", self.public_base_url, token);

        let body = format!(
            "Hello {username},\n\n\
             Thank you for registering!\n\n\
             Please verify your email address by clicking the link below:\n\n\
             {verification_url}\n\n\
             If you did not create this account, please ignore this email.\n",
        );

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| MailerError::Message(format!("invalid from address: {e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| MailerError::Message(format!("invalid recipient: {e}")))?)
            .subject("Verify your email address")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailerError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Send(e.to_string()))?;

        info!(to = %to_email, "verification email sent");
        Ok(())
    }
}
