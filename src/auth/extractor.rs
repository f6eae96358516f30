// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated callers.
//!
//! Use the `Auth` extractor in handlers to require a verified bearer token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! `AdminOnly` additionally requires the token's role claim to be `admin`
//! and rejects everything else with 403 before the handler body runs, so
//! unauthorized callers never trigger downstream I/O.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Pull the bearer token out of the request headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Extractor for authenticated callers.
///
/// Validates the `Authorization: Bearer <token>` header against the shared
/// signing secret and exposes the caller identity. The role is read from
/// the verified token's claim only; no header shim exists.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Tests (and any future middleware) may pre-populate the caller.
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let token = bearer_token(&parts.headers)?;

        let claims = state
            .codec
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(Auth(AuthenticatedUser::from_claims(&claims)))
    }
}

/// Extractor that requires the admin role.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AuthError::AccessDenied);
        }

        Ok(AdminOnly(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::state::tests::test_state;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_requires_header() {
        let state = test_state();
        let mut parts = parts_with_header(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_rejects_non_bearer_header() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Basic abc123"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_rejects_garbage_token() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Bearer not.a.token"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn auth_accepts_token_signed_with_shared_secret() {
        let state = test_state();
        let token = state.test_token("alice", Role::Moderator);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(result.0.username, "alice");
        assert_eq!(result.0.role, Role::Moderator);
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let state = test_state();
        let token = state.test_token("bob", Role::User);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::AccessDenied)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin() {
        let state = test_state();
        let token = state.test_token("root", Role::Admin);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await.unwrap();
        assert!(result.0.is_admin());
    }

    #[tokio::test]
    async fn extractor_prefers_extensions() {
        let state = test_state();
        let mut parts = parts_with_header(None);
        parts.extensions.insert(AuthenticatedUser {
            username: "preset".to_string(),
            role: Role::Admin,
        });

        let result = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(result.0.username, "preset");
    }
}
