// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook payload parsing and event dispatch.
//!
//! Payloads arrive as `{entry: [{changes: [{field, value}]}]}`. Changes with
//! `field == "comments"` or `field == "messages"` become [`InboundEvent`]s;
//! anything else is ignored. Malformed changes are dropped with a warning
//! rather than failing the delivery.

use gramline_core::types::{CommentEvent, InboundEvent, MessageEvent};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::automation::AutomationEngine;

/// Top-level webhook delivery body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Option<Vec<WebhookEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookChange {
    pub field: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CommentValue {
    id: String,
    text: String,
    media: MediaRef,
    from: Sender,
}

#[derive(Debug, Deserialize)]
struct MediaRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Sender {
    id: String,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageValue {
    #[serde(default)]
    text: Option<String>,
    from: Sender,
}

/// Extracts the inbound events from a delivery, skipping malformed changes.
pub fn extract_events(payload: &WebhookPayload) -> Vec<InboundEvent> {
    let Some(entries) = payload.entry.as_ref() else {
        warn!("webhook delivery has no entry array");
        return Vec::new();
    };

    let mut events = Vec::new();
    for entry in entries {
        for change in &entry.changes {
            match change.field.as_str() {
                "comments" => match serde_json::from_value::<CommentValue>(change.value.clone()) {
                    Ok(value) => events.push(InboundEvent::Comment(CommentEvent {
                        comment_id: value.id,
                        post_id: value.media.id,
                        text: value.text,
                        commenter_id: value.from.id,
                        commenter_username: value.from.username.unwrap_or_default(),
                    })),
                    Err(e) => warn!(error = %e, "malformed comment change dropped"),
                },
                "messages" => match serde_json::from_value::<MessageValue>(change.value.clone()) {
                    Ok(value) => events.push(InboundEvent::Message(MessageEvent {
                        text: value.text.unwrap_or_default(),
                        sender_id: value.from.id,
                        sender_username: value.from.username.unwrap_or_default(),
                    })),
                    Err(e) => warn!(error = %e, "malformed message change dropped"),
                },
                other => debug!(field = other, "ignoring unhandled change field"),
            }
        }
    }
    events
}

/// Runs every event in a delivery through the engine.
///
/// Outcomes are logged, never surfaced: the ingress boundary acknowledges
/// deliveries unconditionally to avoid retry storms.
pub async fn process_delivery(engine: &AutomationEngine, payload: &WebhookPayload) {
    for event in extract_events(payload) {
        let outcome = match &event {
            InboundEvent::Comment(comment) => engine.handle_comment_event(comment).await,
            InboundEvent::Message(message) => engine.handle_message_event(message).await,
        };
        debug!(?outcome, "webhook event processed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment_payload(comment_id: &str, media_id: &str, text: &str) -> WebhookPayload {
        serde_json::from_value(serde_json::json!({
            "entry": [{
                "changes": [{
                    "field": "comments",
                    "value": {
                        "id": comment_id,
                        "text": text,
                        "media": {"id": media_id},
                        "from": {"id": "c1", "username": "alice"}
                    }
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn comment_change_becomes_comment_event() {
        let payload = comment_payload("cmt-1", "ig-post-1", "@order please");
        let events = extract_events(&payload);
        assert_eq!(
            events,
            vec![InboundEvent::Comment(CommentEvent {
                comment_id: "cmt-1".to_string(),
                post_id: "ig-post-1".to_string(),
                text: "@order please".to_string(),
                commenter_id: "c1".to_string(),
                commenter_username: "alice".to_string(),
            })]
        );
    }

    #[test]
    fn message_change_becomes_message_event() {
        let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
            "entry": [{
                "changes": [{
                    "field": "messages",
                    "value": {"text": "hi", "from": {"id": "c2", "username": "bob"}}
                }]
            }]
        }))
        .unwrap();

        let events = extract_events(&payload);
        assert_eq!(
            events,
            vec![InboundEvent::Message(MessageEvent {
                text: "hi".to_string(),
                sender_id: "c2".to_string(),
                sender_username: "bob".to_string(),
            })]
        );
    }

    #[test]
    fn unknown_fields_and_malformed_changes_are_dropped() {
        let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
            "entry": [{
                "changes": [
                    {"field": "story_insights", "value": {"anything": true}},
                    {"field": "comments", "value": {"text": "missing ids"}},
                    {
                        "field": "comments",
                        "value": {
                            "id": "cmt-2",
                            "text": "valid",
                            "media": {"id": "ig-post-1"},
                            "from": {"id": "c1"}
                        }
                    }
                ]
            }]
        }))
        .unwrap();

        let events = extract_events(&payload);
        assert_eq!(events.len(), 1);
        match &events[0] {
            InboundEvent::Comment(c) => {
                assert_eq!(c.comment_id, "cmt-2");
                // Username missing from the sender block defaults empty.
                assert_eq!(c.commenter_username, "");
            }
            other => panic!("expected comment event, got {other:?}"),
        }
    }

    #[test]
    fn missing_entry_yields_no_events() {
        let payload: WebhookPayload = serde_json::from_str("{}").unwrap();
        assert!(extract_events(&payload).is_empty());
    }

    #[test]
    fn multiple_entries_flatten_in_order() {
        let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
            "entry": [
                {"changes": [{
                    "field": "comments",
                    "value": {
                        "id": "cmt-1", "text": "a",
                        "media": {"id": "m1"}, "from": {"id": "c1"}
                    }
                }]},
                {"changes": [{
                    "field": "comments",
                    "value": {
                        "id": "cmt-2", "text": "b",
                        "media": {"id": "m2"}, "from": {"id": "c2"}
                    }
                }]}
            ]
        }))
        .unwrap();

        let events = extract_events(&payload);
        assert_eq!(events.len(), 2);
    }
}
