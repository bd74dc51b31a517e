// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Instagram Graph API.
//!
//! Provides [`InstagramClient`], which implements [`MessagingGateway`] over
//! the Graph API's comment-reply, messaging, and profile endpoints. Each
//! call is a single attempt; the automation engine records failures rather
//! than retrying.

use std::time::Duration;

use async_trait::async_trait;
use gramline_config::MetaConfig;
use gramline_core::types::Profile;
use gramline_core::{GramlineError, MessagingGateway};
use tracing::debug;

use crate::types::{
    CommentReplyRequest, DirectMessageRequest, GraphErrorResponse, MessageBody, Recipient,
};

/// Fields requested when fetching a profile.
const PROFILE_FIELDS: &str = "id,username,name,biography,followers_count,website";

/// Instagram Graph API client.
#[derive(Debug, Clone)]
pub struct InstagramClient {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl InstagramClient {
    /// Creates a client from the `[meta]` configuration section.
    pub fn new(config: &MetaConfig) -> Result<Self, GramlineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GramlineError::Gateway {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.graph_api_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, tail: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.api_version, tail)
    }

    /// Issues a POST and maps non-2xx responses to a gateway error.
    async fn post_json<T: serde::Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<(), GramlineError> {
        let response =
            self.client.post(url).json(body).send().await.map_err(|e| {
                GramlineError::Gateway {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;

        let status = response.status();
        debug!(status = %status, url, "graph api response received");
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(graph_error(status, &body))
    }
}

/// Builds a gateway error from a Graph API failure body.
fn graph_error(status: reqwest::StatusCode, body: &str) -> GramlineError {
    let message = if let Ok(err) = serde_json::from_str::<GraphErrorResponse>(body) {
        format!("graph api error ({status}): {}", err.error.message)
    } else {
        format!("graph api returned {status}: {body}")
    };
    GramlineError::Gateway {
        message,
        source: None,
    }
}

#[async_trait]
impl MessagingGateway for InstagramClient {
    async fn send_comment_reply(
        &self,
        comment_id: &str,
        text: &str,
        access_token: &str,
    ) -> Result<(), GramlineError> {
        let url = self.endpoint(&format!("{comment_id}/replies"));
        let payload = CommentReplyRequest {
            message: text.to_string(),
            access_token: access_token.to_string(),
        };
        self.post_json(&url, &payload).await
    }

    async fn send_direct_message(
        &self,
        recipient_id: &str,
        text: &str,
        access_token: &str,
        business_account_id: &str,
    ) -> Result<(), GramlineError> {
        let url = self.endpoint(&format!("{business_account_id}/messages"));
        let payload = DirectMessageRequest {
            recipient: Recipient {
                id: recipient_id.to_string(),
            },
            message: MessageBody {
                text: text.to_string(),
            },
            access_token: access_token.to_string(),
        };
        self.post_json(&url, &payload).await
    }

    async fn fetch_profile(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Profile, GramlineError> {
        let url = self.endpoint(user_id);
        let response = self
            .client
            .get(&url)
            .query(&[("fields", PROFILE_FIELDS), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| GramlineError::Gateway {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, url, "profile response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(graph_error(status, &body));
        }

        response.json().await.map_err(|e| GramlineError::Gateway {
            message: format!("failed to parse profile response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
