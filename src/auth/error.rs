// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Rejections produced while authenticating a request.
///
/// Token verification failures are deliberately coarse: callers cannot tell
/// a bad signature from an expired token.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Token failed verification (bad signature, malformed, or expired)
    InvalidToken,
    /// Token verified but its subject has no matching principal
    UnknownPrincipal,
    /// Valid caller, insufficient role
    AccessDenied,
}

#[derive(Serialize)]
struct AuthErrorBody {
    detail: String,
    error_code: String,
}

impl AuthError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::UnknownPrincipal => "unknown_principal",
            AuthError::AccessDenied => "access_denied",
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken
            | AuthError::UnknownPrincipal => StatusCode::UNAUTHORIZED,
            AuthError::AccessDenied => StatusCode::FORBIDDEN,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(
                    f,
                    "Invalid authorization header format (expected 'Bearer <token>')"
                )
            }
            AuthError::InvalidToken => write!(f, "Could not validate credentials"),
            AuthError::UnknownPrincipal => write!(f, "User not found"),
            // Fixed wording: clients match on this string.
            AuthError::AccessDenied => write!(f, "Access denied"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            detail: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "missing_auth_header");
    }

    #[tokio::test]
    async fn access_denied_returns_403_with_fixed_detail() {
        let response = AuthError::AccessDenied.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["detail"], "Access denied");
    }

    #[test]
    fn invalid_token_is_unauthorized() {
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::UnknownPrincipal.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
