// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./chatscreen.toml` > `~/.config/chatscreen/chatscreen.toml`
//! > `/etc/chatscreen/chatscreen.toml`, with `CHATSCREEN_` environment
//! variable overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ChatscreenConfig;

/// File name looked up in every config directory.
pub const CONFIG_FILE_NAME: &str = "chatscreen.toml";

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/chatscreen/chatscreen.toml";

/// Sections recognized by the env provider, in mapping order.
const ENV_SECTIONS: &[&str] = &[
    "server",
    "storage",
    "gemini",
    "uploads",
    "auth",
    "conversation",
];

/// Returns the XDG user config path, if a config dir is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chatscreen").join(CONFIG_FILE_NAME))
}

/// Builds the Figment for the standard hierarchy.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/chatscreen/chatscreen.toml`
/// 3. `~/.config/chatscreen/chatscreen.toml`
/// 4. `./chatscreen.toml`
/// 5. `CHATSCREEN_*` environment variables
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ChatscreenConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<ChatscreenConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ChatscreenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatscreenConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ChatscreenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatscreenConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider mapping `CHATSCREEN_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `CHATSCREEN_GEMINI_API_KEY` maps to `gemini.api_key`.
fn env_provider() -> Env {
    Env::prefixed("CHATSCREEN_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env key to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_section_then_field() {
        assert_eq!(map_env_key("gemini_api_key"), "gemini.api_key");
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(
            map_env_key("conversation_default_username"),
            "conversation.default_username"
        );
        assert_eq!(map_env_key("uploads_max_bytes"), "uploads.max_bytes");
    }

    #[test]
    fn unknown_env_section_is_left_alone() {
        assert_eq!(map_env_key("logging_level"), "logging_level");
    }
}
