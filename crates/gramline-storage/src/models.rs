// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! One struct per table. Timestamps are RFC 3339 strings so lexicographic
//! ordering equals chronological ordering.

use gramline_core::types::{AutomationMode, LogStatus};
use serde::{Deserialize, Serialize};

/// A connected account owner. Supplied by an external identity collaborator;
/// the engine only reads the token and business account id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub instagram_user_id: String,
    #[serde(skip_serializing)]
    pub instagram_access_token: String,
    #[serde(skip_serializing)]
    pub instagram_business_account_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Maps an external post id to its owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub instagram_post_id: String,
    pub created_at: String,
}

/// A keyword-triggered automation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub keyword_trigger: String,
    pub response_message: String,
    pub automation_mode: AutomationMode,
    pub is_active: bool,
    pub case_sensitive: bool,
    pub trigger_count: i64,
    pub success_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Append-only record of one processed comment event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentLog {
    pub id: String,
    pub user_id: String,
    pub rule_id: Option<String>,
    pub instagram_post_id: String,
    pub commenter_id: String,
    pub commenter_username: String,
    pub comment_text: String,
    pub response_sent: String,
    pub status: LogStatus,
    pub error_message: Option<String>,
    pub created_at: String,
}

/// Append-only record of one dispatched direct message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmLog {
    pub id: String,
    pub user_id: String,
    pub rule_id: Option<String>,
    pub recipient_id: String,
    pub recipient_username: String,
    pub message_text: String,
    pub automation_mode: AutomationMode,
    pub status: LogStatus,
    pub error_message: Option<String>,
    pub created_at: String,
}

/// Daily rollup row, upserted idempotently per (user_id, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStat {
    pub user_id: String,
    pub date: String,
    pub comments_sent: i64,
    pub dms_sent: i64,
    pub failed: i64,
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn timestamp_now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Today's UTC calendar date as `YYYY-MM-DD`.
pub fn date_today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Parse a TEXT column holding a string-backed enum.
///
/// Converts parse failures into a rusqlite conversion error so query_map
/// closures can use `?` directly.
pub(crate) fn column_enum<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
