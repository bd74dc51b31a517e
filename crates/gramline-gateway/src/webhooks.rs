// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingress routes.
//!
//! `GET /webhooks/instagram` answers the platform's subscription handshake;
//! `POST /webhooks/instagram` accepts deliveries. Deliveries are always
//! acknowledged with 200 so the platform does not retry-storm us; processing
//! failures surface only in logs and log rows.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gramline_engine::webhook::{WebhookPayload, process_delivery};
use tracing::warn;

use crate::ErrorResponse;
use crate::server::GatewayState;

/// GET /webhooks/instagram
///
/// Echoes `hub.challenge` as an integer iff `hub.mode == "subscribe"` and
/// `hub.verify_token` matches the configured secret.
pub async fn verify_subscription(
    State(state): State<GatewayState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mode = params.get("hub.mode").map(String::as_str).unwrap_or("");
    let token = params
        .get("hub.verify_token")
        .map(String::as_str)
        .unwrap_or("");

    if mode != "subscribe" || token != state.verify_token {
        warn!(mode, "webhook verification rejected");
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "verification failed".to_string(),
            }),
        )
            .into_response();
    }

    match params.get("hub.challenge").and_then(|c| c.parse::<i64>().ok()) {
        Some(challenge) => (StatusCode::OK, challenge.to_string()).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "invalid challenge".to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /webhooks/instagram
pub async fn receive_delivery(
    State(state): State<GatewayState>,
    Json(payload): Json<WebhookPayload>,
) -> Json<serde_json::Value> {
    process_delivery(&state.engine, &payload).await;
    Json(serde_json::json!({"status": "ok"}))
}
