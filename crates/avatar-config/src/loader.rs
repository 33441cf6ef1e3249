// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./avatar.toml` > `~/.config/avatar/avatar.toml` > `/etc/avatar/avatar.toml`
//! with environment variable overrides via `AVATAR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AvatarConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/avatar/avatar.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "avatar.toml";

/// Location of the per-user configuration file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("avatar/avatar.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/avatar/avatar.toml` (system-wide)
/// 3. `~/.config/avatar/avatar.toml` (user XDG config)
/// 4. `./avatar.toml` (local directory)
/// 5. `AVATAR_*` environment variables
pub fn load_config() -> Result<AvatarConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<AvatarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AvatarConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AvatarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AvatarConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AvatarConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `AVATAR_MEMORY_RECENCY_WINDOW` must map to
/// `memory.recency_window`, not `memory.recency.window`.
fn env_provider() -> Env {
    Env::prefixed("AVATAR_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("memory_", "memory.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn env_vars_map_to_nested_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("AVATAR_MEMORY_RECENCY_WINDOW", "7");
            jail.set_env("AVATAR_OPENAI_DEFAULT_MODEL", "text-davinci-003");
            jail.set_env("AVATAR_AGENT_NAME", "envbot");

            let config = load_config()?;
            assert_eq!(config.memory.recency_window, 7);
            assert_eq!(config.openai.default_model, "text-davinci-003");
            assert_eq!(config.agent.name, "envbot");
            Ok(())
        });
    }

    #[test]
    fn local_file_is_picked_up_and_env_wins() {
        Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
[memory]
recency_window = 4
summary_max_chars = 200
"#,
            )?;
            jail.set_env("AVATAR_MEMORY_RECENCY_WINDOW", "9");

            let config = load_config()?;
            assert_eq!(config.memory.recency_window, 9);
            assert_eq!(config.memory.summary_max_chars, Some(200));
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_loaded() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[openai]\nmax_retries = 2\n")?;
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.openai.max_retries, 2);
            Ok(())
        });
    }
}
