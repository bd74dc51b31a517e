// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword match predicate for automation rules.
//!
//! The decision is deterministic given (rule, text): normalize case per the
//! rule's flag, then accept on a plain substring hit or a word-boundary hit.
//! The substring check subsumes the boundary check; both are kept as an OR
//! to preserve the observed matching behavior exactly.

use gramline_storage::AutomationRule;
use tracing::warn;

/// Returns true when `text` triggers `rule`.
pub fn rule_matches(rule: &AutomationRule, text: &str) -> bool {
    let (trigger, haystack) = if rule.case_sensitive {
        (rule.keyword_trigger.clone(), text.to_string())
    } else {
        (rule.keyword_trigger.to_lowercase(), text.to_lowercase())
    };

    if haystack.contains(&trigger) {
        return true;
    }

    let pattern = format!(r"\b{}\b", regex::escape(&trigger));
    match regex::Regex::new(&pattern) {
        Ok(re) => re.is_match(&haystack),
        Err(e) => {
            // escape() output is always a valid pattern; guard anyway.
            warn!(rule_id = %rule.id, error = %e, "keyword pattern failed to compile");
            false
        }
    }
}
