// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Gramline automation backend.
//!
//! This crate provides the error type, the shared domain types (log statuses,
//! automation modes, inbound events, engine outcomes), and the trait seam the
//! engine uses to talk to the external messaging platform.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::GramlineError;
pub use traits::MessagingGateway;
pub use types::{AutomationMode, AutomationOutcome, InboundEvent, LogStatus, SkipReason};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_can_be_constructed() {
        let _config = GramlineError::Config("test".into());
        let _storage = GramlineError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _gateway = GramlineError::Gateway {
            message: "test".into(),
            source: None,
        };
        let _internal = GramlineError::Internal("test".into());
    }

    #[test]
    fn gateway_error_displays_message() {
        let err = GramlineError::Gateway {
            message: "comment reply rejected".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "gateway error: comment reply rejected");
    }

    #[test]
    fn skip_reason_display_is_snake_case() {
        assert_eq!(SkipReason::UnknownPost.to_string(), "unknown_post");
        assert_eq!(SkipReason::NoMatchingRule.to_string(), "no_matching_rule");
        assert_eq!(
            SkipReason::MissingCredentials.to_string(),
            "missing_credentials"
        );
    }
}
