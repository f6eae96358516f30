// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe. Always returns 200 while the process serves requests.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe.
///
/// Checks local configuration only; does not call downstream services, so a
/// degraded downstream never flaps this gateway out of rotation.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Service is not ready", body = HealthResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let config = &state.config;

    let missing = if config.jwt_secret.is_empty() {
        Some("signing secret")
    } else if config.smtp_user.is_empty() || config.smtp_password.is_empty() {
        Some("SMTP credentials")
    } else if !config.auth_service_url.has_host() || !config.post_service_url.has_host() {
        Some("downstream service URLs")
    } else {
        None
    };

    if let Some(what) = missing {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: format!("not ready: missing {what}"),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ready".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use crate::state::tests::test_harness;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_is_public() {
        let app = router(test_harness().state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_passes_with_config() {
        let app = router(test_harness().state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
