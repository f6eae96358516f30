// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    clients::{ContentStats, MessageResponse, UserStats, UserSummary},
    models::Principal,
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/token", post(auth::token))
        .route("/auth/verify-email", get(auth::verify_email))
        .route("/users/me", get(users::get_current_user))
        .route("/admin/users/", get(admin::list_users))
        .route("/admin/users/{user_id}/block", post(admin::block_user))
        .route("/admin/users/{user_id}/unblock", post(admin::unblock_user))
        .route("/admin/users/{user_id}/role", patch(admin::change_role))
        .route("/admin/posts/{post_id}", delete(admin::delete_post))
        .route("/admin/comments/{comment_id}", delete(admin::delete_comment))
        .route("/admin/stats", get(admin::get_stats))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    routes
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::token,
        auth::verify_email,
        users::get_current_user,
        admin::list_users,
        admin::block_user,
        admin::unblock_user,
        admin::change_role,
        admin::delete_post,
        admin::delete_comment,
        admin::get_stats,
        health::health,
        health::readiness
    ),
    components(
        schemas(
            Principal,
            UserSummary,
            UserStats,
            ContentStats,
            MessageResponse,
            auth::RegisterRequest,
            auth::TokenRequest,
            auth::TokenResponse,
            users::UserMeResponse,
            admin::AdminStatsResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration, token issuance and email verification"),
        (name = "Users", description = "Authenticated user profile"),
        (name = "Admin", description = "Admin-gated moderation relayed to downstream services"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
