// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Direct message log read/write operations.

use gramline_core::GramlineError;
use gramline_core::types::LogStatus;
use rusqlite::params;

use crate::database::Database;
use crate::models::DmLog;

const DM_LOG_COLUMNS: &str = "id, user_id, rule_id, recipient_id, recipient_username,
     message_text, automation_mode, status, error_message, created_at";

fn row_to_dm_log(row: &rusqlite::Row<'_>) -> rusqlite::Result<DmLog> {
    Ok(DmLog {
        id: row.get(0)?,
        user_id: row.get(1)?,
        rule_id: row.get(2)?,
        recipient_id: row.get(3)?,
        recipient_username: row.get(4)?,
        message_text: row.get(5)?,
        automation_mode: crate::models::column_enum(6, row.get::<_, String>(6)?)?,
        status: crate::models::column_enum(7, row.get::<_, String>(7)?)?,
        error_message: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Append a DM log entry.
pub async fn insert_dm_log(db: &Database, log: &DmLog) -> Result<(), GramlineError> {
    let log = log.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO dm_logs (id, user_id, rule_id, recipient_id,
                     recipient_username, message_text, automation_mode,
                     status, error_message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    log.id,
                    log.user_id,
                    log.rule_id,
                    log.recipient_id,
                    log.recipient_username,
                    log.message_text,
                    log.automation_mode.to_string(),
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

/// List a user's DM logs at or after `since`, newest first.
pub async fn list_dm_logs(
    db: &Database,
    user_id: &str,
    since: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<DmLog>, GramlineError> {
    let user_id = user_id.to_string();
    let since = since.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DM_LOG_COLUMNS} FROM dm_logs
                 WHERE user_id = ?1 AND created_at >= ?2
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?3 OFFSET ?4"
            ))?;
            let rows = stmt.query_map(params![user_id, since, limit, skip], row_to_dm_log)?;
            let mut logs = Vec::new();
            for row in rows {
                logs.push(row?);
            }
            Ok(logs)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count a user's DM logs at or after `since`.
pub async fn count_dm_logs(db: &Database, user_id: &str, since: &str) -> Result<i64, GramlineError> {
    let user_id = user_id.to_string();
    let since = since.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM dm_logs WHERE user_id = ?1 AND created_at >= ?2",
                params![user_id, since],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count a user's DM logs with the given status.
pub async fn count_dm_logs_by_status(
    db: &Database,
    user_id: &str,
    status: LogStatus,
) -> Result<i64, GramlineError> {
    let user_id = user_id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM dm_logs WHERE user_id = ?1 AND status = ?2",
                params![user_id, status],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count a user's total DM logs.
pub async fn count_all_dm_logs(db: &Database, user_id: &str) -> Result<i64, GramlineError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM dm_logs WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count a user's DM logs with a status inside `[start, end)`.
pub async fn count_dm_logs_status_between(
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
                "SELECT COUNT(*) FROM dm_logs
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
