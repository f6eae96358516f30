// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Current-user endpoint.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::{bearer_token, AuthError},
    models::Principal,
    state::AppState,
};

/// Profile of the authenticated caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub email_verified: bool,
}

impl From<Principal> for UserMeResponse {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            username: principal.username,
            email: principal.email,
            role: principal.role.as_str().to_string(),
            is_active: principal.is_active,
            email_verified: principal.email_verified,
        }
    }
}

/// Return the authenticated caller's profile.
///
/// A structurally valid token whose subject no longer exists in the store
/// is rejected the same way as an invalid one.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller profile", body = UserMeResponse),
        (status = 401, description = "Missing, invalid or unresolvable token")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserMeResponse>, AuthError> {
    let token = bearer_token(&headers)?;
    let principal = state.auth_service.resolve_principal(token).await?;

    Ok(Json(principal.into()))
}
