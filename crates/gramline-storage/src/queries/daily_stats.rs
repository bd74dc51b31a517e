// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily rollup upserts.
//!
//! The upsert is additive, so replaying the same event twice double-counts.
//! Dedup happens upstream or not at all; the rollup never rejects.

use gramline_core::GramlineError;
use rusqlite::params;

use crate::database::Database;
use crate::models::DailyStat;

/// Add deltas to the (user, date) rollup row, creating it if absent.
pub async fn bump_daily_stat(
    db: &Database,
    user_id: &str,
    date: &str,
    comments_sent: i64,
    dms_sent: i64,
    failed: i64,
) -> Result<(), GramlineError> {
    let user_id = user_id.to_string();
    let date = date.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO daily_stats (user_id, date, comments_sent, dms_sent, failed)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id, date) DO UPDATE SET
                     comments_sent = comments_sent + excluded.comments_sent,
                     dms_sent = dms_sent + excluded.dms_sent,
                     failed = failed + excluded.failed",
                params![user_id, date, comments_sent, dms_sent, failed],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Read one rollup row.
pub async fn get_daily_stat(
    db: &Database,
    user_id: &str,
    date: &str,
) -> Result<Option<DailyStat>, GramlineError> {
    let user_id = user_id.to_string();
    let date = date.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT user_id, date, comments_sent, dms_sent, failed
                 FROM daily_stats WHERE user_id = ?1 AND date = ?2",
                params![user_id, date],
                |row| {
                    Ok(DailyStat {
                        user_id: row.get(0)?,
                        date: row.get(1)?,
                        comments_sent: row.get(2)?,
                        dms_sent: row.get(3)?,
                        failed: row.get(4)?,
                    })
                },
            );
            match result {
                Ok(stat) => Ok(Some(stat)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
