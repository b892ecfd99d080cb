// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: non-empty addresses
//! and paths, supported upload extensions, Argon2 minimums and timeouts.

use crate::diagnostic::ConfigError;
use crate::model::{ChatscreenConfig, IMAGE_EXTENSIONS};

/// Log levels accepted by `server.log_level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Minimum session secret length in bytes (HMAC-SHA256 block of entropy).
const MIN_SESSION_SECRET_BYTES: usize = 32;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &ChatscreenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.port == 0 {
        fail("server.port must be between 1 and 65535".to_string());
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        fail(format!(
            "server.log_level `{}` must be one of {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if let Some(secret) = &config.server.session_secret
        && secret.len() < MIN_SESSION_SECRET_BYTES
    {
        fail(format!(
            "server.session_secret must be at least {MIN_SESSION_SECRET_BYTES} bytes, got {}",
            secret.len()
        ));
    }

    if config.server.session_ttl_secs == 0 {
        fail("server.session_ttl_secs must be greater than 0".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.gemini.model.trim().is_empty() {
        fail("gemini.model must not be empty".to_string());
    }

    if !config.gemini.api_base_url.starts_with("http://")
        && !config.gemini.api_base_url.starts_with("https://")
    {
        fail(format!(
            "gemini.api_base_url `{}` must start with http:// or https://",
            config.gemini.api_base_url
        ));
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be at least 1".to_string());
    }

    if config.uploads.directory.trim().is_empty() {
        fail("uploads.directory must not be empty".to_string());
    }

    if config.uploads.allowed_extensions.is_empty() {
        fail("uploads.allowed_extensions must list at least one extension".to_string());
    }

    for ext in &config.uploads.allowed_extensions {
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            fail(format!(
                "uploads.allowed_extensions entry `{ext}` is not one of {}",
                IMAGE_EXTENSIONS.join(", ")
            ));
        }
    }

    if config.uploads.max_bytes == 0 {
        fail("uploads.max_bytes must be greater than 0".to_string());
    }

    // Argon2 requires at least 8 KiB of memory per lane.
    if config.auth.hash_parallelism < 1 {
        fail(format!(
            "auth.hash_parallelism must be at least 1, got {}",
            config.auth.hash_parallelism
        ));
    }

    if config.auth.hash_memory_cost < 8 * config.auth.hash_parallelism.max(1) {
        fail(format!(
            "auth.hash_memory_cost must be at least 8 KiB per lane, got {}",
            config.auth.hash_memory_cost
        ));
    }

    if config.auth.hash_iterations < 1 {
        fail(format!(
            "auth.hash_iterations must be at least 1, got {}",
            config.auth.hash_iterations
        ));
    }

    if config.conversation.default_username.trim().is_empty() {
        fail("conversation.default_username must not be empty".to_string());
    }

    if config.conversation.generation_timeout_secs == 0 {
        fail("conversation.generation_timeout_secs must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
