// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instagram Graph API adapter.
//!
//! Implements [`gramline_core::MessagingGateway`] over the Graph API's
//! comment-reply, direct-message, and profile endpoints.

pub mod client;
pub mod types;

pub use client::InstagramClient;
