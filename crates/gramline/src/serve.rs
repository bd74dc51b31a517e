// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `serve` subcommand: wires storage, gateway client, engine, and the
//! HTTP surface together and runs until shutdown.

use std::sync::Arc;

use gramline_config::GramlineConfig;
use gramline_core::GramlineError;
use gramline_engine::AutomationEngine;
use gramline_gateway::GatewayState;
use gramline_instagram::InstagramClient;
use gramline_storage::Database;
use tracing::info;

pub async fn run(config: &GramlineConfig) -> Result<(), GramlineError> {
    let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;
    info!(path = %config.storage.database_path, "database ready");

    let client = InstagramClient::new(&config.meta)?;
    let engine = AutomationEngine::new(db, Arc::new(client));

    let state = GatewayState {
        engine,
        verify_token: config.meta.verify_token.clone(),
    };

    gramline_gateway::start_server(&config.server.host, config.server.port, state).await
}
