// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The messaging gateway seam.
//!
//! The automation engine talks to the external messaging platform only
//! through this trait, so tests can substitute a fake that records calls
//! and simulates send failures.

use async_trait::async_trait;

use crate::error::GramlineError;
use crate::types::Profile;

/// Outbound operations against the external messaging platform.
///
/// Each operation issues exactly one outbound call with a bounded timeout.
/// No retries are performed; an `Err` is a terminal outcome for the attempt.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Post a public reply to a comment.
    async fn send_comment_reply(
        &self,
        comment_id: &str,
        text: &str,
        access_token: &str,
    ) -> Result<(), GramlineError>;

    /// Send a private direct message on behalf of a business account.
    async fn send_direct_message(
        &self,
        recipient_id: &str,
        text: &str,
        access_token: &str,
        business_account_id: &str,
    ) -> Result<(), GramlineError>;

    /// Fetch a user's public profile.
    async fn fetch_profile(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Profile, GramlineError>;
}
