// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types shared across the Gramline workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Outcome status recorded on a comment or DM log row.
///
/// A row is `Sent` iff the gateway call for it returned success. Log rows are
/// append-only and never change status after insert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Pending,
    Sent,
    Failed,
    Skipped,
}

/// Whether a matched rule replies publicly only, or also sends a DM.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AutomationMode {
    CommentOnly,
    CommentAndDm,
}

/// An inbound event parsed from a webhook delivery. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A new comment on a connected account's post.
    Comment(CommentEvent),
    /// A new direct message to a connected account.
    Message(MessageEvent),
}

/// A comment event from the webhook payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEvent {
    pub comment_id: String,
    pub post_id: String,
    pub text: String,
    pub commenter_id: String,
    pub commenter_username: String,
}

/// A direct-message event from the webhook payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub text: String,
    pub sender_id: String,
    pub sender_username: String,
}

/// Result of running one inbound event through the automation engine.
///
/// `Executed` means a rule matched and the dispatch sequence ran to
/// completion; per-channel send success is captured in the log rows, not
/// here. `Skipped` writes zero log rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationOutcome {
    /// A rule matched and both dispatch legs were attempted.
    Executed,
    /// No automation fired; no log rows were written.
    Skipped(SkipReason),
    /// An unexpected failure was caught at the engine boundary.
    Failed(String),
}

/// Why an event was skipped without writing any log rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// The post id did not resolve to a known owner.
    UnknownPost,
    /// No active rule matched the event text.
    NoMatchingRule,
    /// The owner has no usable access token.
    MissingCredentials,
}

/// A public profile fetched from the messaging platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub website: Option<String>,
}
