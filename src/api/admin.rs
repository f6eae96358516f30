// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only moderation endpoints.
//!
//! Every handler takes [`AdminOnly`], so the role check happens before the
//! handler body runs: unauthorized callers are rejected with 403 and no
//! downstream call is ever made. Authorized requests are relayed to the
//! service that owns the resource, and downstream responses (success or
//! failure) pass through unchanged.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::{AdminOnly, Role},
    clients::{MessageResponse, UserSummary},
    error::ApiError,
    state::AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the role change endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ChangeRoleParams {
    /// Target role: one of `user`, `moderator`, `admin`.
    pub new_role: String,
}

/// Aggregate platform statistics, merged from the Auth and Post services.
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct AdminStatsResponse {
    /// Total registered users.
    pub total_users: u64,
    /// Users currently active (not blocked).
    pub active_users: u64,
    /// Users currently blocked.
    pub banned_users: u64,
    /// Total posts across the platform.
    pub total_posts: u64,
    /// Total comments across the platform.
    pub total_comments: u64,
}

// ============================================================================
// Handlers
// ============================================================================

/// List all users (admin view).
///
/// Relays to the Auth service and returns the summaries ordered by id.
#[utoipa::path(
    get,
    path = "/admin/users/",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User summaries", body = [UserSummary]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn list_users(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let mut users = state.auth_client.list_users().await?;
    users.sort_by_key(|u| u.id);

    info!(admin = %admin.username, count = users.len(), "admin listed users");
    Ok(Json(users))
}

/// Block a user.
#[utoipa::path(
    post,
    path = "/admin/users/{user_id}/block",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User blocked", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "User not found (from Auth service)")
    )
)]
pub async fn block_user(
    AdminOnly(admin): AdminOnly,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let response = state.auth_client.block_user(user_id).await?;

    info!(admin = %admin.username, user_id, "admin blocked user");
    Ok(Json(response))
}

/// Unblock a user.
#[utoipa::path(
    post,
    path = "/admin/users/{user_id}/unblock",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User unblocked", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "User not found (from Auth service)")
    )
)]
pub async fn unblock_user(
    AdminOnly(admin): AdminOnly,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let response = state.auth_client.unblock_user(user_id).await?;

    info!(admin = %admin.username, user_id, "admin unblocked user");
    Ok(Json(response))
}

/// Change a user's role.
///
/// The role value is validated locally before any downstream call.
#[utoipa::path(
    patch,
    path = "/admin/users/{user_id}/role",
    tag = "Admin",
    params(ChangeRoleParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Role changed", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "User not found (from Auth service)"),
        (status = 422, description = "Unknown role value")
    )
)]
pub async fn change_role(
    AdminOnly(admin): AdminOnly,
    Path(user_id): Path<i64>,
    Query(params): Query<ChangeRoleParams>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let new_role = Role::parse(&params.new_role).ok_or_else(|| {
        ApiError::unprocessable(format!(
            "Invalid role '{}': expected one of user, moderator, admin",
            params.new_role
        ))
    })?;

    let response = state.auth_client.change_role(user_id, new_role).await?;

    info!(admin = %admin.username, user_id, role = %new_role, "admin changed user role");
    Ok(Json(response))
}

/// Delete a post.
#[utoipa::path(
    delete,
    path = "/admin/posts/{post_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "Post not found (from Post service)")
    )
)]
pub async fn delete_post(
    AdminOnly(admin): AdminOnly,
    Path(post_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let response = state.post_client.delete_post(post_id).await?;

    info!(admin = %admin.username, post_id, "admin deleted post");
    Ok(Json(response))
}

/// Delete a comment.
#[utoipa::path(
    delete,
    path = "/admin/comments/{comment_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "Comment not found (from Post service)")
    )
)]
pub async fn delete_comment(
    AdminOnly(admin): AdminOnly,
    Path(comment_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let response = state.post_client.delete_comment(comment_id).await?;

    info!(admin = %admin.username, comment_id, "admin deleted comment");
    Ok(Json(response))
}

/// Get aggregate platform statistics.
///
/// Queries the Auth service and then the Post service (sequentially) and
/// merges both counts into one response.
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate statistics", body = AdminStatsResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn get_stats(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<AdminStatsResponse>, ApiError> {
    let users = state.auth_client.user_stats().await?;
    let content = state.post_client.content_stats().await?;

    info!(admin = %admin.username, "admin fetched platform stats");
    Ok(Json(AdminStatsResponse {
        total_users: users.total_users,
        active_users: users.active_users,
        banned_users: users.banned_users,
        total_posts: content.total_posts,
        total_comments: content.total_comments,
    }))
}

// ============================================================================
// Tests
// ============================================================================
