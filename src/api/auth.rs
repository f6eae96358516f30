// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential exchange and email verification endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

use crate::{
    clients::MessageResponse, error::ApiError, models::Principal, state::AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Registration payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Credential exchange payload (`application/x-www-form-urlencoded`).
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Issued access token.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Query parameter for the verification link.
#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyEmailParams {
    pub token: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new account.
///
/// Hashes the password, stores the principal and sends a verification email
/// carrying a longer-lived email token.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Principal),
        (status = 409, description = "Username already registered"),
        (status = 422, description = "Malformed payload")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Principal>), ApiError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::unprocessable("username and password are required"));
    }

    let digest = state
        .auth_service
        .hasher()
        .hash(&request.password)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let principal = state
        .store
        .write()
        .await
        .insert(request.username, request.email, digest)?;

    let email_token = state
        .auth_service
        .create_email_token(&principal)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    state
        .mailer
        .send_verification_email(&principal.email, &principal.username, &email_token)
        .await
        .map_err(|e| {
            error!(error = %e, "verification email dispatch failed");
            ApiError::internal("Failed to send verification email")
        })?;

    info!(username = %principal.username, "account registered");
    Ok((StatusCode::CREATED, Json(principal)))
}

/// Exchange credentials for an access token.
///
/// Fails closed with one uniform 401 for unknown usernames and wrong
/// passwords alike.
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "Auth",
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn token(
    State(state): State<AppState>,
    Form(request): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let principal = state
        .auth_service
        .authenticate(&request.username, &request.password)
        .await
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let access_token = state
        .auth_service
        .create_access_token(&principal)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!(username = %principal.username, "access token issued");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Confirm email ownership via the emailed link.
#[utoipa::path(
    get,
    path = "/auth/verify-email",
    tag = "Auth",
    params(VerifyEmailParams),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid or expired token")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    let principal = state
        .auth_service
        .confirm_email(&params.token)
        .await
        .map_err(|_| ApiError::bad_request("Invalid or expired token"))?;

    info!(username = %principal.username, "email verified");
    Ok(Json(MessageResponse {
        message: format!("Email verified for {}", principal.username),
    }))
}

// ============================================================================
// Tests
// ============================================================================
