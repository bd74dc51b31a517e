// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log listing and dashboard analytics routes.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use gramline_engine::analytics;
use serde::Deserialize;

use crate::internal_error;
use crate::rules::UserScope;
use crate::server::GatewayState;

/// Query parameters shared by both log listings.
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub user_id: String,
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub days: Option<i64>,
}

impl LogQuery {
    fn window(&self) -> (i64, i64, i64) {
        let skip = self.skip.unwrap_or(0).max(0);
        let limit = analytics::clamp_limit(self.limit);
        let days = analytics::clamp_days(self.days);
        (skip, limit, days)
    }
}

/// GET /logs/comments
pub async fn list_comment_logs(
    State(state): State<GatewayState>,
    Query(query): Query<LogQuery>,
) -> Response {
    let (skip, limit, days) = query.window();
    match analytics::comment_log_page(state.engine.database(), &query.user_id, skip, limit, days)
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /logs/dms
pub async fn list_dm_logs(
    State(state): State<GatewayState>,
    Query(query): Query<LogQuery>,
) -> Response {
    let (skip, limit, days) = query.window();
    match analytics::dm_log_page(state.engine.database(), &query.user_id, skip, limit, days).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /logs/stats
pub async fn dashboard_stats(
    State(state): State<GatewayState>,
    Query(scope): Query<UserScope>,
) -> Response {
    match analytics::dashboard_stats(state.engine.database(), &scope.user_id).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /logs/activity-summary
pub async fn activity_summary(
    State(state): State<GatewayState>,
    Query(scope): Query<UserScope>,
) -> Response {
    match analytics::weekly_breakdown(state.engine.database(), &scope.user_id).await {
        Ok(days) => Json(days).into_response(),
        Err(e) => internal_error(e),
    }
}
