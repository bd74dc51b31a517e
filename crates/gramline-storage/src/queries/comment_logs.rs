// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Comment log read/write operations.
//!
//! Logs are append-only; listings are newest-first with skip/limit paging.

use gramline_core::GramlineError;
use gramline_core::types::LogStatus;
use rusqlite::params;

use crate::database::Database;
use crate::models::CommentLog;

const COMMENT_LOG_COLUMNS: &str = "id, user_id, rule_id, instagram_post_id, commenter_id,
     commenter_username, comment_text, response_sent, status, error_message, created_at";

fn row_to_comment_log(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentLog> {
    Ok(CommentLog {
        id: row.get(0)?,
        user_id: row.get(1)?,
        rule_id: row.get(2)?,
        instagram_post_id: row.get(3)?,
        commenter_id: row.get(4)?,
        commenter_username: row.get(5)?,
        comment_text: row.get(6)?,
        response_sent: row.get(7)?,
        status: crate::models::column_enum(8, row.get::<_, String>(8)?)?,
        error_message: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Append a comment log entry.
pub async fn insert_comment_log(db: &Database, log: &CommentLog) -> Result<(), GramlineError> {
    let log = log.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO comment_logs (id, user_id, rule_id, instagram_post_id,
                     commenter_id, commenter_username, comment_text, response_sent,
                     status, error_message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    log.id,
                    log.user_id,
                    log.rule_id,
                    log.instagram_post_id,
                    log.commenter_id,
                    log.commenter_username,
                    log.comment_text,
                    log.response_sent,
                    log.status.to_string(),
                    log.error_message,
                    log.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a user's comment logs at or after `since`, newest first.
pub async fn list_comment_logs(
    db: &Database,
    user_id: &str,
    since: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<CommentLog>, GramlineError> {
    let user_id = user_id.to_string();
    let since = since.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMMENT_LOG_COLUMNS} FROM comment_logs
                 WHERE user_id = ?1 AND created_at >= ?2
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?3 OFFSET ?4"
            ))?;
            let rows = stmt.query_map(params![user_id, since, limit, skip], row_to_comment_log)?;
            let mut logs = Vec::new();
            for row in rows {
                logs.push(row?);
            }
            Ok(logs)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count a user's comment logs at or after `since`.
pub async fn count_comment_logs(
    db: &Database,
    user_id: &str,
    since: &str,
) -> Result<i64, GramlineError> {
    let user_id = user_id.to_string();
    let since = since.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM comment_logs WHERE user_id = ?1 AND created_at >= ?2",
                params![user_id, since],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count a user's comment logs with the given status.
pub async fn count_comment_logs_by_status(
    db: &Database,
    user_id: &str,
    status: LogStatus,
) -> Result<i64, GramlineError> {
    let user_id = user_id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM comment_logs WHERE user_id = ?1 AND status = ?2",
                params![user_id, status],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count a user's total comment logs.
pub async fn count_all_comment_logs(db: &Database, user_id: &str) -> Result<i64, GramlineError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM comment_logs WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count a user's comment logs with a status inside `[start, end)`.
///
/// Used by the weekly breakdown, one call per day bucket.
pub async fn count_comment_logs_status_between(
    db: &Database,
    user_id: &str,
    status: LogStatus,
    start: &str,
    end: &str,
) -> Result<i64, GramlineError> {
    let user_id = user_id.to_string();
    let status = status.to_string();
    let start = start.to_string();
    let end = end.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM comment_logs
                 WHERE user_id = ?1 AND status = ?2
                   AND created_at >= ?3 AND created_at < ?4",
                params![user_id, status, start, end],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
