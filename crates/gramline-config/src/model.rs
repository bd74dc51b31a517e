// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Gramline automation backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Gramline configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GramlineConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Meta Graph API settings.
    #[serde(default)]
    pub meta: MetaConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Meta Graph API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetaConfig {
    /// Meta app id. `None` is acceptable for local development.
    #[serde(default)]
    pub app_id: Option<String>,

    /// Meta app secret.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Shared secret for webhook subscription verification.
    #[serde(default = "default_verify_token")]
    pub verify_token: String,

    /// Base URL of the Graph API.
    #[serde(default = "default_graph_api_url")]
    pub graph_api_url: String,

    /// Graph API version path segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Outbound HTTP timeout in seconds for gateway calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_secret: None,
            verify_token: default_verify_token(),
            graph_api_url: default_graph_api_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Display for MetaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets stay out of log output.
        write!(
            f,
            "MetaConfig {{ graph_api_url: {}, api_version: {}, timeout_secs: {} }}",
            self.graph_api_url, self.api_version, self.timeout_secs
        )
    }
}

fn default_verify_token() -> String {
    "change-me".to_string()
}

fn default_graph_api_url() -> String {
    "https://graph.instagram.com".to_string()
}

fn default_api_version() -> String {
    "v18.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("gramline").join("gramline.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "gramline.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}
