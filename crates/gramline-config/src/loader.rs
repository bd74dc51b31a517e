// SPDX-FileCopyrightText: 2026 Gramline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./gramline.toml` > `~/.config/gramline/gramline.toml`
//! > `/etc/gramline/gramline.toml` with environment variable overrides via the
//! `GRAMLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::GramlineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/gramline/gramline.toml` (system-wide)
/// 3. `~/.config/gramline/gramline.toml` (user XDG config)
/// 4. `./gramline.toml` (local directory)
/// 5. `GRAMLINE_*` environment variables
pub fn load_config() -> Result<GramlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GramlineConfig::default()))
        .merge(Toml::file("/etc/gramline/gramline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("gramline/gramline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("gramline.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<GramlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GramlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<GramlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GramlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `GRAMLINE_META_VERIFY_TOKEN` must map to
/// `meta.verify_token`, not `meta.verify.token`.
fn env_provider() -> Env {
    Env::prefixed("GRAMLINE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: GRAMLINE_META_VERIFY_TOKEN -> "meta_verify_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("meta_", "meta.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_str_merges_over_defaults() {
        let config = load_config_from_str(
            r#"
[server]
port = 9090

[meta]
verify_token = "hook-secret"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.meta.verify_token, "hook-secret");
    }

    #[test]
    fn load_from_str_rejects_unknown_section() {
        let result = load_config_from_str("[webhooks]\nenabled = true\n");
        assert!(result.is_err());
    }
}
