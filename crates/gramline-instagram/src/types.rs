// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Instagram Graph API.

use serde::{Deserialize, Serialize};

/// Payload for `POST /{comment_id}/replies`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentReplyRequest {
    pub message: String,
    pub access_token: String,
}

/// Payload for `POST /{business_account_id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct DirectMessageRequest {
    pub recipient: Recipient,
    pub message: MessageBody,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipient {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageBody {
    pub text: String,
}

/// Graph API error envelope: `{"error": {"message", "type", "code"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorResponse {
    pub error: GraphError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    pub message: String,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub code: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dm_request_serializes_nested_recipient() {
        let req = DirectMessageRequest {
            recipient: Recipient { id: "c1".into() },
            message: MessageBody {
                text: "Thanks!".into(),
            },
            access_token: "tok".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["recipient"]["id"], "c1");
        assert_eq!(json["message"]["text"], "Thanks!");
        assert_eq!(json["access_token"], "tok");
    }

    #[test]
    fn graph_error_parses_partial_bodies() {
        let err: GraphErrorResponse =
            serde_json::from_str(r#"{"error":{"message":"Invalid OAuth token"}}"#).unwrap();
        assert_eq!(err.error.message, "Invalid OAuth token");
        assert!(err.error.code.is_none());
    }
}
