// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only dashboard aggregation over the log and rule stores.

use chrono::{Duration, NaiveDate, Utc};
use gramline_core::GramlineError;
use gramline_core::types::LogStatus;
use gramline_storage::queries::{comment_logs, dm_logs, rules};
use gramline_storage::{CommentLog, Database, DmLog};
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const MAX_WINDOW_DAYS: i64 = 90;

/// Clamp a requested page size into `[1, MAX_PAGE_SIZE]`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Clamp a requested history window into `[1, MAX_WINDOW_DAYS]`.
pub fn clamp_days(days: Option<i64>) -> i64 {
    days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, MAX_WINDOW_DAYS)
}

/// Pagination metadata included with every log listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub total_pages: i64,
}

/// One page of results plus its pagination envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Builds the envelope for a skip/limit window over `total` rows.
pub fn paginate(total: i64, skip: i64, limit: i64) -> Pagination {
    Pagination {
        total,
        page: skip / limit + 1,
        page_size: limit,
        has_next: skip + limit < total,
        has_previous: skip > 0,
        total_pages: (total + limit - 1) / limit,
    }
}

/// RFC 3339 timestamp `days` days before now.
fn window_start(days: i64) -> String {
    (Utc::now() - Duration::days(days))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Half-open UTC day bounds `[00:00:00 of date, 00:00:00 of date+1)`.
fn day_bounds(date: NaiveDate) -> (String, String) {
    let fmt = |d: NaiveDate| format!("{}T00:00:00.000Z", d.format("%Y-%m-%d"));
    (fmt(date), fmt(date + Duration::days(1)))
}

/// A paginated comment log listing, windowed to the last `days` days.
pub async fn comment_log_page(
    db: &Database,
    user_id: &str,
    skip: i64,
    limit: i64,
    days: i64,
) -> Result<Page<CommentLog>, GramlineError> {
    let since = window_start(days);
    let data = comment_logs::list_comment_logs(db, user_id, &since, skip, limit).await?;
    let total = comment_logs::count_comment_logs(db, user_id, &since).await?;
    Ok(Page {
        data,
        pagination: paginate(total, skip, limit),
    })
}

/// A paginated DM log listing, windowed to the last `days` days.
pub async fn dm_log_page(
    db: &Database,
    user_id: &str,
    skip: i64,
    limit: i64,
    days: i64,
) -> Result<Page<DmLog>, GramlineError> {
    let since = window_start(days);
    let data = dm_logs::list_dm_logs(db, user_id, &since, skip, limit).await?;
    let total = dm_logs::count_dm_logs(db, user_id, &since).await?;
    Ok(Page {
        data,
        pagination: paginate(total, skip, limit),
    })
}

/// Per-day activity counts for the summary breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub date: String,
    pub comments_sent: i64,
    pub dms_sent: i64,
    pub failed: i64,
    pub total: i64,
}

/// Dashboard aggregate returned by the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_comments_sent: i64,
    pub total_dms_sent: i64,
    pub comments_sent_today: i64,
    pub dms_sent_today: i64,
    pub active_rules: i64,
    pub failed_actions: i64,
    pub success_rate: f64,
    pub engagement_rate: f64,
    pub weekly_activity: Vec<DayActivity>,
    pub date: String,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of attempted actions that were delivered, across both
/// channels combined. Sent and failed counts span comments and DMs;
/// skipped events never reach a log row and are not attempts.
fn delivery_rate(sent: i64, failed: i64) -> f64 {
    round2(sent as f64 / (sent + failed).max(1) as f64 * 100.0)
}

/// Fixed 7-day breakdown ending today, oldest day first.
pub async fn weekly_breakdown(
    db: &Database,
    user_id: &str,
) -> Result<Vec<DayActivity>, GramlineError> {
    let today = Utc::now().date_naive();
    let mut days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let (start, end) = day_bounds(date);

        let comments_sent =
            comment_logs::count_comment_logs_status_between(db, user_id, LogStatus::Sent, &start, &end)
                .await?;
        let comments_failed =
            comment_logs::count_comment_logs_status_between(db, user_id, LogStatus::Failed, &start, &end)
                .await?;
        let dms_sent =
            dm_logs::count_dm_logs_status_between(db, user_id, LogStatus::Sent, &start, &end)
                .await?;
        let dms_failed =
            dm_logs::count_dm_logs_status_between(db, user_id, LogStatus::Failed, &start, &end)
                .await?;

        let failed = comments_failed + dms_failed;
        days.push(DayActivity {
            date: date.format("%Y-%m-%d").to_string(),
            comments_sent,
            dms_sent,
            failed,
            total: comments_sent + dms_sent + failed,
        });
    }
    Ok(days)
}

/// Computes the full dashboard aggregate for one user.
pub async fn dashboard_stats(db: &Database, user_id: &str) -> Result<DashboardStats, GramlineError> {
    let total_comments_sent =
        comment_logs::count_comment_logs_by_status(db, user_id, LogStatus::Sent).await?;
    let total_dms_sent = dm_logs::count_dm_logs_by_status(db, user_id, LogStatus::Sent).await?;
    let comments_failed =
        comment_logs::count_comment_logs_by_status(db, user_id, LogStatus::Failed).await?;
    let dms_failed = dm_logs::count_dm_logs_by_status(db, user_id, LogStatus::Failed).await?;

    let today = Utc::now().date_naive();
    let (today_start, today_end) = day_bounds(today);
    let comments_sent_today = comment_logs::count_comment_logs_status_between(
        db,
        user_id,
        LogStatus::Sent,
        &today_start,
        &today_end,
    )
    .await?;
    let dms_sent_today =
        dm_logs::count_dm_logs_status_between(db, user_id, LogStatus::Sent, &today_start, &today_end)
            .await?;

    let failed_actions = comments_failed + dms_failed;
    // Both rates are the same combined-channel ratio; the dashboard
    // surfaces them under two labels.
    let rate = delivery_rate(total_comments_sent + total_dms_sent, failed_actions);

    Ok(DashboardStats {
        total_comments_sent,
        total_dms_sent,
        comments_sent_today,
        dms_sent_today,
        active_rules: rules::count_active_rules(db, user_id).await?,
        failed_actions,
        success_rate: rate,
        engagement_rate: rate,
        weekly_activity: weekly_breakdown(db, user_id).await?,
        date: today.format("%Y-%m-%d").to_string(),
    })
}
