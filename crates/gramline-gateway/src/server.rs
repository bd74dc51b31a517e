// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the API surface.

use axum::routing::{get, post};
use axum::{Json, Router};
use gramline_core::GramlineError;
use gramline_engine::AutomationEngine;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{logs, rules, webhooks};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Automation engine (owns the database handle).
    pub engine: AutomationEngine,
    /// Shared secret checked during webhook subscription verification.
    pub verify_token: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Builds the full application router.
///
/// The dashboard frontend is served from another origin, so CORS is
/// permissive across the whole surface.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route(
            "/webhooks/instagram",
            get(webhooks::verify_subscription).post(webhooks::receive_delivery),
        )
        .route("/rules", post(rules::create_rule).get(rules::list_rules))
        .route(
            "/rules/{id}",
            get(rules::get_rule)
                .put(rules::update_rule)
                .delete(rules::delete_rule),
        )
        .route("/logs/comments", get(logs::list_comment_logs))
        .route("/logs/dms", get(logs::list_dm_logs))
        .route("/logs/stats", get(logs::dashboard_stats))
        .route("/logs/activity-summary", get(logs::activity_summary))
        .route("/health", get(get_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds to host:port and serves the API until shutdown.
pub async fn start_server(
    host: &str,
    port: u16,
    state: GatewayState,
) -> Result<(), GramlineError> {
    let app = router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GramlineError::Internal(format!("failed to bind to {addr}: {e}")))?;

    tracing::info!("gramline api listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| GramlineError::Internal(format!("server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let (state, _dir) = test_state().await;
        let response = router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
