// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Comment automation pipeline.
//!
//! One [`AutomationEngine::handle_comment_event`] call per inbound comment:
//! resolve the post owner, pick the first matching active rule, send the
//! reply, log the outcome, roll up daily stats, and optionally send the
//! follow-up DM. Nothing unwinds past the engine; unexpected errors become
//! [`AutomationOutcome::Failed`].

use std::sync::Arc;

use gramline_core::types::{
    AutomationMode, AutomationOutcome, CommentEvent, LogStatus, MessageEvent, SkipReason,
};
use gramline_core::{GramlineError, MessagingGateway};
use gramline_storage::models::{CommentLog, DmLog, date_today, timestamp_now};
use gramline_storage::queries::{comment_logs, daily_stats, dm_logs, posts, rules, users};
use gramline_storage::{AutomationRule, Database, User};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::matcher::rule_matches;

/// Drives rule matching and reply dispatch for inbound events.
#[derive(Clone)]
pub struct AutomationEngine {
    db: Database,
    gateway: Arc<dyn MessagingGateway>,
}

impl AutomationEngine {
    pub fn new(db: Database, gateway: Arc<dyn MessagingGateway>) -> Self {
        Self { db, gateway }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Processes one comment event end to end.
    pub async fn handle_comment_event(&self, event: &CommentEvent) -> AutomationOutcome {
        match self.run_comment_pipeline(event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(comment_id = %event.comment_id, error = %e, "comment pipeline failed");
                AutomationOutcome::Failed(e.to_string())
            }
        }
    }

    /// Message events carry no automation; acknowledge and move on.
    pub async fn handle_message_event(&self, event: &MessageEvent) -> AutomationOutcome {
        info!(sender_id = %event.sender_id, "received direct message event");
        AutomationOutcome::Skipped(SkipReason::NoMatchingRule)
    }

    async fn run_comment_pipeline(
        &self,
        event: &CommentEvent,
    ) -> Result<AutomationOutcome, GramlineError> {
        let Some(owner_id) = posts::find_post_owner(&self.db, &event.post_id).await? else {
            debug!(post_id = %event.post_id, "comment for untracked post");
            return Ok(AutomationOutcome::Skipped(SkipReason::UnknownPost));
        };

        let active = rules::list_active_rules(&self.db, &owner_id).await?;
        let Some(rule) = active.into_iter().find(|r| rule_matches(r, &event.text)) else {
            debug!(post_id = %event.post_id, "no rule matched comment");
            return Ok(AutomationOutcome::Skipped(SkipReason::NoMatchingRule));
        };

        let user = match users::get_user(&self.db, &owner_id).await? {
            Some(user) if !user.instagram_access_token.is_empty() => user,
            _ => {
                debug!(user_id = %owner_id, "post owner has no usable access token");
                return Ok(AutomationOutcome::Skipped(SkipReason::MissingCredentials));
            }
        };

        let comment_sent = self.run_comment_leg(event, &rule, &user).await?;

        if rule.automation_mode == AutomationMode::CommentAndDm {
            self.run_dm_leg(event, &rule, &user).await?;
        }

        debug!(
            comment_id = %event.comment_id,
            rule_id = %rule.id,
            comment_sent,
            "automation executed"
        );
        Ok(AutomationOutcome::Executed)
    }

    /// Sends the comment reply and records log, rule counters, and rollup.
    /// Returns whether the send succeeded.
    async fn run_comment_leg(
        &self,
        event: &CommentEvent,
        rule: &AutomationRule,
        user: &User,
    ) -> Result<bool, GramlineError> {
        let send = self
            .gateway
            .send_comment_reply(
                &event.comment_id,
                &rule.response_message,
                &user.instagram_access_token,
            )
            .await;

        let (status, error_message) = match send {
            Ok(()) => (LogStatus::Sent, None),
            Err(e) => {
                warn!(comment_id = %event.comment_id, error = %e, "comment reply failed");
                (LogStatus::Failed, Some(e.to_string()))
            }
        };
        let sent = status == LogStatus::Sent;

        let log = CommentLog {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            rule_id: Some(rule.id.clone()),
            instagram_post_id: event.post_id.clone(),
            commenter_id: event.commenter_id.clone(),
            commenter_username: event.commenter_username.clone(),
            comment_text: event.text.clone(),
            response_sent: rule.response_message.clone(),
            status,
            error_message,
            created_at: timestamp_now(),
        };
        comment_logs::insert_comment_log(&self.db, &log).await?;
        rules::record_rule_trigger(&self.db, &rule.id, sent).await?;
        daily_stats::bump_daily_stat(
            &self.db,
            &user.id,
            &date_today(),
            sent as i64,
            0,
            (!sent) as i64,
        )
        .await?;

        Ok(sent)
    }

    /// Sends the follow-up DM. A missing business account id aborts only
    /// this leg; the comment leg has already completed.
    async fn run_dm_leg(
        &self,
        event: &CommentEvent,
        rule: &AutomationRule,
        user: &User,
    ) -> Result<(), GramlineError> {
        let Some(business_account_id) = user
            .instagram_business_account_id
            .as_deref()
            .filter(|id| !id.is_empty())
        else {
            debug!(user_id = %user.id, "no business account id, skipping dm leg");
            return Ok(());
        };

        let send = self
            .gateway
            .send_direct_message(
                &event.commenter_id,
                &rule.response_message,
                &user.instagram_access_token,
                business_account_id,
            )
            .await;

        let (status, error_message) = match send {
            Ok(()) => (LogStatus::Sent, None),
            Err(e) => {
                warn!(recipient_id = %event.commenter_id, error = %e, "direct message failed");
                (LogStatus::Failed, Some(e.to_string()))
            }
        };
        let sent = status == LogStatus::Sent;

        let log = DmLog {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            rule_id: Some(rule.id.clone()),
            recipient_id: event.commenter_id.clone(),
            recipient_username: event.commenter_username.clone(),
            message_text: rule.response_message.clone(),
            automation_mode: rule.automation_mode,
            status,
            error_message,
            created_at: timestamp_now(),
        };
        dm_logs::insert_dm_log(&self.db, &log).await?;
        daily_stats::bump_daily_stat(
            &self.db,
            &user.id,
            &date_today(),
            0,
            sent as i64,
            (!sent) as i64,
        )
        .await?;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::FakeGateway;
    use super::*;
    use gramline_storage::models::Post;
    use tempfile::tempdir;

    async fn setup(gateway: FakeGateway) -> (AutomationEngine, Arc<FakeGateway>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let user = User {
            id: "u1".to_string(),
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            instagram_user_id: "ig-1".to_string(),
            instagram_access_token: "token-1".to_string(),
            instagram_business_account_id: Some("biz-1".to_string()),
            is_active: true,
            created_at: timestamp_now(),
            updated_at: timestamp_now(),
        };
        users::create_user(&db, &user).await.unwrap();

        let post = Post {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            instagram_post_id: "ig-post-1".to_string(),
            created_at: timestamp_now(),
        };
        posts::create_post(&db, &post).await.unwrap();

        let gateway = Arc::new(gateway);
        let engine = AutomationEngine::new(db, gateway.clone());
        (engine, gateway, dir)
    }

    async fn seed_rule(engine: &AutomationEngine, rule: &AutomationRule) {
        rules::create_rule(engine.database(), rule).await.unwrap();
    }

    fn make_rule(id: &str, trigger: &str, mode: AutomationMode, created_at: &str) -> AutomationRule {
        AutomationRule {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: format!("rule {id}"),
            description: None,
            keyword_trigger: trigger.to_string(),
            response_message: format!("reply from {id}"),
            automation_mode: mode,
            is_active: true,
            case_sensitive: false,
            trigger_count: 0,
            success_count: 0,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    fn make_event(text: &str) -> CommentEvent {
        CommentEvent {
            comment_id: "cmt-1".to_string(),
            post_id: "ig-post-1".to_string(),
            text: text.to_string(),
            commenter_id: "c1".to_string(),
            commenter_username: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn unknown_post_is_skipped_with_zero_logs() {
        let (engine, gateway, _dir) = setup(FakeGateway::default()).await;

        let mut event = make_event("@order please");
        event.post_id = "ig-post-unknown".to_string();
        let outcome = engine.handle_comment_event(&event).await;

        assert_eq!(
            outcome,
            AutomationOutcome::Skipped(SkipReason::UnknownPost)
        );
        assert!(gateway.comment_replies.lock().unwrap().is_empty());
        assert_eq!(
            comment_logs::count_all_comment_logs(engine.database(), "u1")
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn no_matching_rule_is_skipped_with_zero_logs() {
        let (engine, _gateway, _dir) = setup(FakeGateway::default()).await;
        seed_rule(
            &engine,
            &make_rule("r1", "giveaway", AutomationMode::CommentOnly, "2026-01-01T00:00:01.000Z"),
        )
        .await;

        let outcome = engine.handle_comment_event(&make_event("nice photo")).await;
        assert_eq!(
            outcome,
            AutomationOutcome::Skipped(SkipReason::NoMatchingRule)
        );
        assert_eq!(
            comment_logs::count_all_comment_logs(engine.database(), "u1")
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn case_insensitive_match_sends_reply_and_logs_sent() {
        let (engine, gateway, _dir) = setup(FakeGateway::default()).await;
        seed_rule(
            &engine,
            &make_rule("r1", "@order", AutomationMode::CommentOnly, "2026-01-01T00:00:01.000Z"),
        )
        .await;

        let outcome = engine.handle_comment_event(&make_event("I want to @ORDER now")).await;
        assert_eq!(outcome, AutomationOutcome::Executed);

        let replies = gateway.comment_replies.lock().unwrap().clone();
        assert_eq!(replies, vec![("cmt-1".to_string(), "reply from r1".to_string())]);

        let logs = comment_logs::list_comment_logs(
            engine.database(),
            "u1",
            "2026-01-01T00:00:00.000Z",
            0,
            10,
        )
        .await
        .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Sent);
        assert_eq!(logs[0].response_sent, "reply from r1");
        assert!(logs[0].error_message.is_none());

        let rule = rules::get_rule(engine.database(), "r1").await.unwrap().unwrap();
        assert_eq!(rule.trigger_count, 1);
        assert_eq!(rule.success_count, 1);

        let stat = daily_stats::get_daily_stat(engine.database(), "u1", &date_today())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stat.comments_sent, 1);
        assert_eq!(stat.failed, 0);
    }

    #[tokio::test]
    async fn comment_and_dm_writes_one_log_per_channel() {
        let (engine, gateway, _dir) = setup(FakeGateway::default()).await;
        seed_rule(
            &engine,
            &make_rule("r1", "@order", AutomationMode::CommentAndDm, "2026-01-01T00:00:01.000Z"),
        )
        .await;

        let outcome = engine.handle_comment_event(&make_event("@order please")).await;
        assert_eq!(outcome, AutomationOutcome::Executed);

        assert_eq!(
            comment_logs::count_all_comment_logs(engine.database(), "u1")
                .await
                .unwrap(),
            1
        );
        let dms = dm_logs::list_dm_logs(engine.database(), "u1", "2026-01-01T00:00:00.000Z", 0, 10)
            .await
            .unwrap();
        assert_eq!(dms.len(), 1);
        assert_eq!(dms[0].recipient_id, "c1");
        assert_eq!(dms[0].status, LogStatus::Sent);
        assert_eq!(
            gateway.direct_messages.lock().unwrap().as_slice(),
            [("c1".to_string(), "reply from r1".to_string())]
        );

        let stat = daily_stats::get_daily_stat(engine.database(), "u1", &date_today())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stat.comments_sent, 1);
        assert_eq!(stat.dms_sent, 1);
    }

    #[tokio::test]
    async fn failed_comment_send_still_attempts_dm() {
        let gateway = FakeGateway {
            fail_comments: true,
            ..FakeGateway::default()
        };
        let (engine, gateway, _dir) = setup(gateway).await;
        seed_rule(
            &engine,
            &make_rule("r1", "@order", AutomationMode::CommentAndDm, "2026-01-01T00:00:01.000Z"),
        )
        .await;

        let outcome = engine.handle_comment_event(&make_event("@order please")).await;
        // The sequence ran to completion even though a channel failed.
        assert_eq!(outcome, AutomationOutcome::Executed);

        let logs = comment_logs::list_comment_logs(
            engine.database(),
            "u1",
            "2026-01-01T00:00:00.000Z",
            0,
            10,
        )
        .await
        .unwrap();
        assert_eq!(logs[0].status, LogStatus::Failed);
        assert!(logs[0].error_message.as_deref().unwrap().contains("rejected"));

        let dms = dm_logs::list_dm_logs(engine.database(), "u1", "2026-01-01T00:00:00.000Z", 0, 10)
            .await
            .unwrap();
        assert_eq!(dms.len(), 1);
        assert_eq!(dms[0].status, LogStatus::Sent);

        let rule = rules::get_rule(engine.database(), "r1").await.unwrap().unwrap();
        assert_eq!(rule.trigger_count, 1);
        assert_eq!(rule.success_count, 0);

        let stat = daily_stats::get_daily_stat(engine.database(), "u1", &date_today())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stat.comments_sent, 0);
        assert_eq!(stat.dms_sent, 1);
        assert_eq!(stat.failed, 1);
    }

    #[tokio::test]
    async fn missing_business_account_aborts_only_dm_leg() {
        let (engine, gateway, _dir) = setup(FakeGateway::default()).await;
        let db = engine.database().clone();
        // Replace the seeded user with one lacking a business account.
        let user = User {
            id: "u2".to_string(),
            username: "joan".to_string(),
            email: "joan@example.com".to_string(),
            instagram_user_id: "ig-2".to_string(),
            instagram_access_token: "token-2".to_string(),
            instagram_business_account_id: None,
            is_active: true,
            created_at: timestamp_now(),
            updated_at: timestamp_now(),
        };
        users::create_user(&db, &user).await.unwrap();
        posts::create_post(
            &db,
            &Post {
                id: "p2".to_string(),
                user_id: "u2".to_string(),
                instagram_post_id: "ig-post-2".to_string(),
                created_at: timestamp_now(),
            },
        )
        .await
        .unwrap();
        let mut rule =
            make_rule("r2", "@order", AutomationMode::CommentAndDm, "2026-01-01T00:00:01.000Z");
        rule.user_id = "u2".to_string();
        seed_rule(&engine, &rule).await;

        let mut event = make_event("@order please");
        event.post_id = "ig-post-2".to_string();
        let outcome = engine.handle_comment_event(&event).await;
        assert_eq!(outcome, AutomationOutcome::Executed);

        assert_eq!(
            comment_logs::count_all_comment_logs(&db, "u2").await.unwrap(),
            1
        );
        assert_eq!(dm_logs::count_all_dm_logs(&db, "u2").await.unwrap(), 0);
        assert!(gateway.direct_messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn first_matching_rule_wins_by_creation_order() {
        let (engine, gateway, _dir) = setup(FakeGateway::default()).await;
        // Both rules match; the one created earlier must win.
        seed_rule(
            &engine,
            &make_rule("r-late", "@order", AutomationMode::CommentOnly, "2026-01-01T00:00:02.000Z"),
        )
        .await;
        seed_rule(
            &engine,
            &make_rule("r-early", "order", AutomationMode::CommentOnly, "2026-01-01T00:00:01.000Z"),
        )
        .await;

        let outcome = engine.handle_comment_event(&make_event("@order please")).await;
        assert_eq!(outcome, AutomationOutcome::Executed);

        let replies = gateway.comment_replies.lock().unwrap().clone();
        assert_eq!(replies[0].1, "reply from r-early");
        assert_eq!(
            comment_logs::count_all_comment_logs(engine.database(), "u1")
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn duplicate_deliveries_each_produce_log_rows() {
        let (engine, _gateway, _dir) = setup(FakeGateway::default()).await;
        seed_rule(
            &engine,
            &make_rule("r1", "@order", AutomationMode::CommentOnly, "2026-01-01T00:00:01.000Z"),
        )
        .await;

        let event = make_event("@order please");
        engine.handle_comment_event(&event).await;
        engine.handle_comment_event(&event).await;

        assert_eq!(
            comment_logs::count_all_comment_logs(engine.database(), "u1")
                .await
                .unwrap(),
            2
        );
        let rule = rules::get_rule(engine.database(), "r1").await.unwrap().unwrap();
        assert_eq!(rule.trigger_count, 2);
    }

    #[tokio::test]
    async fn missing_token_skips_without_logs() {
        let (engine, gateway, _dir) = setup(FakeGateway::default()).await;
        let db = engine.database().clone();
        let user = User {
            id: "u3".to_string(),
            username: "jim".to_string(),
            email: "jim@example.com".to_string(),
            instagram_user_id: "ig-3".to_string(),
            instagram_access_token: String::new(),
            instagram_business_account_id: None,
            is_active: true,
            created_at: timestamp_now(),
            updated_at: timestamp_now(),
        };
        users::create_user(&db, &user).await.unwrap();
        posts::create_post(
            &db,
            &Post {
                id: "p3".to_string(),
                user_id: "u3".to_string(),
                instagram_post_id: "ig-post-3".to_string(),
                created_at: timestamp_now(),
            },
        )
        .await
        .unwrap();
        let mut rule =
            make_rule("r3", "@order", AutomationMode::CommentOnly, "2026-01-01T00:00:01.000Z");
        rule.user_id = "u3".to_string();
        seed_rule(&engine, &rule).await;

        let mut event = make_event("@order please");
        event.post_id = "ig-post-3".to_string();
        let outcome = engine.handle_comment_event(&event).await;

        assert_eq!(
            outcome,
            AutomationOutcome::Skipped(SkipReason::MissingCredentials)
        );
        assert!(gateway.comment_replies.lock().unwrap().is_empty());
        assert_eq!(
            comment_logs::count_all_comment_logs(&db, "u3").await.unwrap(),
            0
        );
    }
}
