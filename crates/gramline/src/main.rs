// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gramline - keyword-triggered Instagram reply automation.
//!
//! Binary entry point: loads configuration, installs the tracing
//! subscriber, and dispatches subcommands.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod serve;

/// Gramline - keyword-triggered Instagram reply automation.
#[derive(Parser, Debug)]
#[command(name = "gramline", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the automation server.
    Serve,
    /// Manage Gramline configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate configuration, then print a summary.
    Check,
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` overrides the configured level when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match gramline_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            gramline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.server.log_level);

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run(&config).await {
                tracing::error!(error = %e, "server exited with error");
                std::process::exit(1);
            }
        }
        Some(Commands::Config {
            command: ConfigCommands::Check,
        }) => {
            println!("configuration ok");
            println!("  server:  {}:{}", config.server.host, config.server.port);
            println!("  meta:    {}", config.meta);
            println!("  storage: {}", config.storage.database_path);
        }
        None => {
            println!("gramline: use --help for available commands");
        }
    }
}
