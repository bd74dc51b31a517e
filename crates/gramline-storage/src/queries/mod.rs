// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod comment_logs;
pub mod daily_stats;
pub mod dm_logs;
pub mod posts;
pub mod rules;
pub mod users;
