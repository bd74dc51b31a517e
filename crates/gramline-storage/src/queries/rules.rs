// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Automation rule CRUD operations.
//!
//! Listing order is pinned to `created_at ASC, id ASC` so first-match-wins
//! in the engine is deterministic rather than store-dependent.

use gramline_core::GramlineError;
use gramline_core::types::AutomationMode;
use rusqlite::params;
use serde::Deserialize;

use crate::database::Database;
use crate::models::{AutomationRule, timestamp_now};

const RULE_COLUMNS: &str = "id, user_id, name, description, keyword_trigger, response_message,
     automation_mode, is_active, case_sensitive, trigger_count, success_count,
     created_at, updated_at";

fn row_to_rule(row: &rusqlite::Row<'_>) -> rusqlite::Result<AutomationRule> {
    Ok(AutomationRule {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        keyword_trigger: row.get(4)?,
        response_message: row.get(5)?,
        automation_mode: crate::models::column_enum(6, row.get::<_, String>(6)?)?,
        is_active: row.get(7)?,
        case_sensitive: row.get(8)?,
        trigger_count: row.get(9)?,
        success_count: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

/// Partial update for a rule; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub keyword_trigger: Option<String>,
    pub response_message: Option<String>,
    pub automation_mode: Option<AutomationMode>,
    pub is_active: Option<bool>,
    pub case_sensitive: Option<bool>,
}

/// Insert a new rule.
pub async fn create_rule(db: &Database, rule: &AutomationRule) -> Result<(), GramlineError> {
    let rule = rule.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO automation_rules (id, user_id, name, description,
                     keyword_trigger, response_message, automation_mode, is_active,
                     case_sensitive, trigger_count, success_count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    rule.id,
                    rule.user_id,
                    rule.name,
                    rule.description,
                    rule.keyword_trigger,
                    rule.response_message,
                    rule.automation_mode.to_string(),
                    rule.is_active,
                    rule.case_sensitive,
                    rule.trigger_count,
                    rule.success_count,
                    rule.created_at,
                    rule.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a rule by ID.
pub async fn get_rule(db: &Database, id: &str) -> Result<Option<AutomationRule>, GramlineError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RULE_COLUMNS} FROM automation_rules WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_rule);
            match result {
                Ok(rule) => Ok(Some(rule)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all rules for a user in pinned order.
pub async fn list_rules(db: &Database, user_id: &str) -> Result<Vec<AutomationRule>, GramlineError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RULE_COLUMNS} FROM automation_rules
                 WHERE user_id = ?1 ORDER BY created_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![user_id], row_to_rule)?;
            let mut rules = Vec::new();
            for row in rows {
                rules.push(row?);
            }
            Ok(rules)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List only active rules for a user, in pinned order.
///
/// This is the set the engine scans for first-match.
pub async fn list_active_rules(
    db: &Database,
    user_id: &str,
) -> Result<Vec<AutomationRule>, GramlineError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RULE_COLUMNS} FROM automation_rules
                 WHERE user_id = ?1 AND is_active = 1
                 ORDER BY created_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![user_id], row_to_rule)?;
            let mut rules = Vec::new();
            for row in rows {
                rules.push(row?);
            }
            Ok(rules)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a partial update to a rule and refresh `updated_at`.
///
/// Returns the updated rule, or `None` if the rule does not exist.
pub async fn update_rule(
    db: &Database,
    id: &str,
    changes: &RuleChanges,
) -> Result<Option<AutomationRule>, GramlineError> {
    let id = id.to_string();
    let changes = changes.clone();
    let now = timestamp_now();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let existing = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {RULE_COLUMNS} FROM automation_rules WHERE id = ?1"
                ))?;
                match stmt.query_row(params![id], row_to_rule) {
                    Ok(rule) => rule,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(e),
                }
            };

            let merged = AutomationRule {
                name: changes.name.unwrap_or(existing.name),
                description: changes.description.or(existing.description),
                keyword_trigger: changes.keyword_trigger.unwrap_or(existing.keyword_trigger),
                response_message: changes
                    .response_message
                    .unwrap_or(existing.response_message),
                automation_mode: changes.automation_mode.unwrap_or(existing.automation_mode),
                is_active: changes.is_active.unwrap_or(existing.is_active),
                case_sensitive: changes.case_sensitive.unwrap_or(existing.case_sensitive),
                updated_at: now,
                ..existing
            };

            tx.execute(
                "UPDATE automation_rules
                 SET name = ?1, description = ?2, keyword_trigger = ?3,
                     response_message = ?4, automation_mode = ?5, is_active = ?6,
                     case_sensitive = ?7, updated_at = ?8
                 WHERE id = ?9",
                params![
                    merged.name,
                    merged.description,
                    merged.keyword_trigger,
                    merged.response_message,
                    merged.automation_mode.to_string(),
                    merged.is_active,
                    merged.case_sensitive,
                    merged.updated_at,
                    merged.id,
                ],
            )?;
            tx.commit()?;
            Ok(Some(merged))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a rule. Returns `true` if a row was removed.
pub async fn delete_rule(db: &Database, id: &str) -> Result<bool, GramlineError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute("DELETE FROM automation_rules WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count active rules for a user.
pub async fn count_active_rules(db: &Database, user_id: &str) -> Result<i64, GramlineError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM automation_rules WHERE user_id = ?1 AND is_active = 1",
                params![user_id],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record that a rule fired, and whether its comment reply succeeded.
///
/// Single UPDATE so the increment is atomic under the single-writer model.
pub async fn record_rule_trigger(
    db: &Database,
    id: &str,
    success: bool,
) -> Result<(), GramlineError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE automation_rules
                 SET trigger_count = trigger_count + 1,
                     success_count = success_count + ?1
                 WHERE id = ?2",
                params![success as i64, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::queries::users::create_user;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let user = User {
            id: "u1".to_string(),
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            instagram_user_id: "ig-1".to_string(),
            instagram_access_token: "token-1".to_string(),
            instagram_business_account_id: None,
            is_active: true,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        create_user(&db, &user).await.unwrap();
        (db, dir)
    }

    fn make_rule(id: &str, trigger: &str, created_at: &str) -> AutomationRule {
        AutomationRule {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: format!("rule {id}"),
            description: None,
            keyword_trigger: trigger.to_string(),
            response_message: "Thanks!".to_string(),
            automation_mode: AutomationMode::CommentOnly,
            is_active: true,
            case_sensitive: false,
            trigger_count: 0,
            success_count: 0,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get_rule_roundtrips() {
        let (db, _dir) = setup_db().await;
        let rule = make_rule("r1", "@order", "2026-01-01T00:00:01.000Z");
        create_rule(&db, &rule).await.unwrap();

        let fetched = get_rule(&db, "r1").await.unwrap().unwrap();
        assert_eq!(fetched.keyword_trigger, "@order");
        assert_eq!(fetched.automation_mode, AutomationMode::CommentOnly);
        assert!(!fetched.case_sensitive);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_active_rules_is_in_creation_order() {
        let (db, _dir) = setup_db().await;
        // Insert out of chronological order.
        create_rule(&db, &make_rule("r2", "later", "2026-01-01T00:00:02.000Z"))
            .await
            .unwrap();
        create_rule(&db, &make_rule("r1", "earlier", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();
        let mut inactive = make_rule("r3", "off", "2026-01-01T00:00:03.000Z");
        inactive.is_active = false;
        create_rule(&db, &inactive).await.unwrap();

        let rules = list_active_rules(&db, "u1").await.unwrap();
        let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_rule_applies_partial_changes() {
        let (db, _dir) = setup_db().await;
        create_rule(&db, &make_rule("r1", "@order", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();

        let changes = RuleChanges {
            response_message: Some("New reply".to_string()),
            automation_mode: Some(AutomationMode::CommentAndDm),
            ..Default::default()
        };
        let updated = update_rule(&db, "r1", &changes).await.unwrap().unwrap();

        // Changed fields applied, untouched fields preserved.
        assert_eq!(updated.response_message, "New reply");
        assert_eq!(updated.automation_mode, AutomationMode::CommentAndDm);
        assert_eq!(updated.keyword_trigger, "@order");
        assert!(updated.updated_at > updated.created_at);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_missing_rule_returns_none() {
        let (db, _dir) = setup_db().await;
        let result = update_rule(&db, "nope", &RuleChanges::default()).await.unwrap();
        assert!(result.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_rule_reports_existence() {
        let (db, _dir) = setup_db().await;
        create_rule(&db, &make_rule("r1", "@order", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();

        assert!(delete_rule(&db, "r1").await.unwrap());
        assert!(!delete_rule(&db, "r1").await.unwrap());
        assert!(get_rule(&db, "r1").await.unwrap().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn record_rule_trigger_increments_counters() {
        let (db, _dir) = setup_db().await;
        create_rule(&db, &make_rule("r1", "@order", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();

        record_rule_trigger(&db, "r1", true).await.unwrap();
        record_rule_trigger(&db, "r1", false).await.unwrap();

        let rule = get_rule(&db, "r1").await.unwrap().unwrap();
        assert_eq!(rule.trigger_count, 2);
        assert_eq!(rule.success_count, 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn count_active_rules_ignores_inactive() {
        let (db, _dir) = setup_db().await;
        create_rule(&db, &make_rule("r1", "a", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();
        let mut inactive = make_rule("r2", "b", "2026-01-01T00:00:02.000Z");
        inactive.is_active = false;
        create_rule(&db, &inactive).await.unwrap();

        assert_eq!(count_active_rules(&db, "u1").await.unwrap(), 1);
        db.close().await.unwrap();
    }
}
