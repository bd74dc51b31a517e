// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the automation engine and its external collaborators.

pub mod gateway;

pub use gateway::MessagingGateway;
