// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and passed
//! around inside [`crate::state::AppState`]. There is no ambient global.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | Symmetric signing secret (HS256) | Required |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | Access token TTL | `30` |
//! | `EMAIL_TOKEN_EXPIRE_MINUTES` | Email verification token TTL | `60` |
//! | `PASSWORD_HASH_TIME_COST` | Argon2 time cost (iterations) | `2` |
//! | `AUTH_SERVICE_URL` | Base URL of the Auth service | `http://auth-service:8001` |
//! | `POST_SERVICE_URL` | Base URL of the Post service | `http://post-service:8003` |
//! | `PUBLIC_BASE_URL` | Public URL used in verification links | `http://localhost:8080` |
//! | `SMTP_HOST` | SMTP relay host | `smtp.gmail.com` |
//! | `SMTP_PORT` | SMTP relay port | `587` |
//! | `SMTP_USER` | SMTP username / from address | Required |
//! | `SMTP_PASSWORD` | SMTP password | Required |
//! | `SEED_ADMIN_USERNAME` | Seed admin account username | Optional |
//! | `SEED_ADMIN_PASSWORD` | Seed admin account password | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `social_gateway=info,tower_http=info` |

use std::env;

use url::Url;

const DEFAULT_AUTH_SERVICE_URL: &str = "http://auth-service:8001";
const DEFAULT_POST_SERVICE_URL: &str = "http://post-service:8003";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;
const DEFAULT_EMAIL_TOKEN_EXPIRE_MINUTES: i64 = 60;
const DEFAULT_PASSWORD_HASH_TIME_COST: u32 = 2;

/// Configuration errors abort startup before the server binds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Process-wide configuration, built once in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Symmetric JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    pub access_token_expire_minutes: i64,
    /// Email verification token lifetime in minutes.
    pub email_token_expire_minutes: i64,
    /// Argon2 time cost used by the password hasher.
    pub password_hash_time_cost: u32,
    /// Base URL of the downstream Auth service.
    pub auth_service_url: Url,
    /// Base URL of the downstream Post service.
    pub post_service_url: Url,
    /// Public base URL embedded in verification links.
    pub public_base_url: Url,
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
    /// SMTP username, also used as the From address.
    pub smtp_user: String,
    /// SMTP password.
    pub smtp_password: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails if `JWT_SECRET` or the SMTP credentials are absent, or if any
    /// value fails to parse. Callers abort startup on error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", "0.0.0.0");
        let port = parse_env("PORT", 8080u16)?;

        let jwt_secret = env_required("JWT_SECRET")?;

        let access_token_expire_minutes = parse_env(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
        )?;
        let email_token_expire_minutes = parse_env(
            "EMAIL_TOKEN_EXPIRE_MINUTES",
            DEFAULT_EMAIL_TOKEN_EXPIRE_MINUTES,
        )?;
        let password_hash_time_cost =
            parse_env("PASSWORD_HASH_TIME_COST", DEFAULT_PASSWORD_HASH_TIME_COST)?;

        let auth_service_url = parse_url("AUTH_SERVICE_URL", DEFAULT_AUTH_SERVICE_URL)?;
        let post_service_url = parse_url("POST_SERVICE_URL", DEFAULT_POST_SERVICE_URL)?;
        let public_base_url = parse_url("PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL)?;

        let smtp_host = env_or_default("SMTP_HOST", DEFAULT_SMTP_HOST);
        let smtp_port = parse_env("SMTP_PORT", DEFAULT_SMTP_PORT)?;
        // Mail credentials are mandatory: verification emails are part of the
        // registration flow, so the service must not start without them.
        let smtp_user = env_required("SMTP_USER")?;
        let smtp_password = env_required("SMTP_PASSWORD")?;

        Ok(Self {
            host,
            port,
            jwt_secret,
            access_token_expire_minutes,
            email_token_expire_minutes,
            password_hash_time_cost,
            auth_service_url,
            post_service_url,
            public_base_url,
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_password,
        })
    }
}

fn env_or_default(var: &'static str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

fn env_required(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_url(var: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = env_or_default(var, default);
    Url::parse(&raw).map_err(|e| ConfigError::InvalidVar {
        var,
        reason: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a config without touching the process environment.
    pub(crate) fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            jwt_secret: "test-secret".to_string(),
            access_token_expire_minutes: 30,
            email_token_expire_minutes: 60,
            password_hash_time_cost: 1,
            auth_service_url: Url::parse("http://auth-service:8001").unwrap(),
            post_service_url: Url::parse("http://post-service:8003").unwrap(),
            public_base_url: Url::parse("http://localhost:8080").unwrap(),
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            smtp_user: "noreply@example.com".to_string(),
            smtp_password: "password".to_string(),
        }
    }

    #[test]
    fn test_config_has_sane_defaults() {
        let config = test_config();
        assert_eq!(config.access_token_expire_minutes, 30);
        assert_eq!(config.email_token_expire_minutes, 60);
        assert_eq!(
            config.auth_service_url.as_str(),
            "http://auth-service:8001/"
        );
    }
}
