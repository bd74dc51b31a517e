// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword automation engine.
//!
//! Turns webhook deliveries into [`gramline_core::types::InboundEvent`]s,
//! matches them against per-user automation rules, dispatches replies through
//! a [`gramline_core::MessagingGateway`], and aggregates the resulting logs
//! for the dashboard.

pub mod analytics;
pub mod automation;
pub mod matcher;
pub mod webhook;

pub use automation::AutomationEngine;
