// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule management routes.
//!
//! Rules are scoped by a `user_id` query parameter; authentication is an
//! external collaborator's concern.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gramline_core::types::AutomationMode;
use gramline_storage::AutomationRule;
use gramline_storage::models::timestamp_now;
use gramline_storage::queries::rules as store;
use gramline_storage::queries::rules::RuleChanges;
use serde::Deserialize;
use uuid::Uuid;

use crate::server::GatewayState;
use crate::{bad_request, internal_error, not_found};

/// Request body for POST /rules.
#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub keyword_trigger: String,
    pub response_message: String,
    pub automation_mode: AutomationMode,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub case_sensitive: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UserScope {
    pub user_id: String,
}

/// POST /rules
pub async fn create_rule(
    State(state): State<GatewayState>,
    Json(body): Json<CreateRuleRequest>,
) -> Response {
    // An empty trigger would substring-match every comment.
    if body.keyword_trigger.trim().is_empty() {
        return bad_request("keyword_trigger must not be empty");
    }

    let now = timestamp_now();
    let rule = AutomationRule {
        id: Uuid::new_v4().to_string(),
        user_id: body.user_id,
        name: body.name,
        description: body.description,
        keyword_trigger: body.keyword_trigger,
        response_message: body.response_message,
        automation_mode: body.automation_mode,
        is_active: body.is_active,
        case_sensitive: body.case_sensitive,
        trigger_count: 0,
        success_count: 0,
        created_at: now.clone(),
        updated_at: now,
    };

    match store::create_rule(state.engine.database(), &rule).await {
        Ok(()) => (StatusCode::CREATED, Json(rule)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /rules?user_id=
pub async fn list_rules(
    State(state): State<GatewayState>,
    Query(scope): Query<UserScope>,
) -> Response {
    match store::list_rules(state.engine.database(), &scope.user_id).await {
        Ok(rules) => Json(rules).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /rules/{id}
pub async fn get_rule(State(state): State<GatewayState>, Path(id): Path<String>) -> Response {
    match store::get_rule(state.engine.database(), &id).await {
        Ok(Some(rule)) => Json(rule).into_response(),
        Ok(None) => not_found("rule"),
        Err(e) => internal_error(e),
    }
}

/// PUT /rules/{id}
pub async fn update_rule(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(changes): Json<RuleChanges>,
) -> Response {
    if changes
        .keyword_trigger
        .as_deref()
        .is_some_and(|t| t.trim().is_empty())
    {
        return bad_request("keyword_trigger must not be empty");
    }

    match store::update_rule(state.engine.database(), &id, &changes).await {
        Ok(Some(rule)) => Json(rule).into_response(),
        Ok(None) => not_found("rule"),
        Err(e) => internal_error(e),
    }
}

/// DELETE /rules/{id}
pub async fn delete_rule(State(state): State<GatewayState>, Path(id): Path<String>) -> Response {
    match store::delete_rule(state.engine.database(), &id).await {
        Ok(true) => Json(serde_json::json!({"status": "deleted"})).into_response(),
        Ok(false) => not_found("rule"),
        Err(e) => internal_error(e),
    }
}
