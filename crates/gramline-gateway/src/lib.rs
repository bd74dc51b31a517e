// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API surface for Gramline.
//!
//! Serves webhook ingress, rule management, and the logs/analytics routes
//! consumed by the dashboard.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gramline_core::GramlineError;
use serde::Serialize;

pub mod logs;
pub mod rules;
pub mod server;
pub mod webhooks;

pub use server::{GatewayState, router, start_server};

/// Error response body shared by all routes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 400 with a JSON body.
pub(crate) fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// 404 with a JSON body.
pub(crate) fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("{what} not found"),
        }),
    )
        .into_response()
}

/// 500 with the error logged; the body carries only a generic message.
pub(crate) fn internal_error(e: GramlineError) -> Response {
    tracing::error!(error = %e, "request handler failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal error".to_string(),
        }),
    )
        .into_response()
}
