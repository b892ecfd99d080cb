// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Chatscreen.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Chatscreen configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatscreenConfig {
    /// HTTP listener and session settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Gemini generation API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Image upload settings.
    #[serde(default)]
    pub uploads: UploadConfig,

    /// Password hashing settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Conversation service settings.
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl ChatscreenConfig {
    /// Returns a copy with secret values replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.gemini.api_key.is_some() {
            copy.gemini.api_key = Some("[redacted]".to_string());
        }
        if copy.server.session_secret.is_some() {
            copy.server.session_secret = Some("[redacted]".to_string());
        }
        copy
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Key for signing session cookies. A random key is generated at
    /// startup when unset, which logs everyone out on restart.
    #[serde(default)]
    pub session_secret: Option<String>,

    /// Seconds a session cookie stays valid after login.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            session_secret: None,
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_session_ttl_secs() -> u64 {
    86_400
}

fn default_log_level() -> String {
    "info".to_string()
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
        .map(|p| p.join("chatscreen").join("chatscreen.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("chatscreen.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` falls back to the `GEMINI_API_KEY` env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for `generateContent`.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// HTTP timeout for a single request.
    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_gemini_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    30
}

/// Image upload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Directory uploaded files are written to and served from.
    #[serde(default = "default_upload_dir")]
    pub directory: String,

    /// Accepted file extensions, lowercase, without the dot.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: usize,

    /// Ask the generation provider to describe each uploaded image.
    #[serde(default)]
    pub describe_images: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: default_upload_dir(),
            allowed_extensions: default_allowed_extensions(),
            max_bytes: default_max_upload_bytes(),
            describe_images: false,
        }
    }
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

/// Extensions the server knows how to serve as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

fn default_allowed_extensions() -> Vec<String> {
    IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

/// Argon2id password hashing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Memory cost in KiB (OWASP recommends 19456 for Argon2id).
    #[serde(default = "default_hash_memory_cost")]
    pub hash_memory_cost: u32,

    /// Number of iterations (time cost).
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,

    /// Degree of parallelism (lanes).
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hash_memory_cost: default_hash_memory_cost(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
        }
    }
}

fn default_hash_memory_cost() -> u32 {
    19456
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

/// Conversation service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationConfig {
    /// Username recorded when a submission names none.
    #[serde(default = "default_username")]
    pub default_username: String,

    /// Upper bound on a single generation call.
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            default_username: default_username(),
            generation_timeout_secs: default_generation_timeout_secs(),
        }
    }
}

fn default_username() -> String {
    "Anonymous".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    30
}
