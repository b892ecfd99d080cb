// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Chatscreen configuration system.

use chatscreen_config::diagnostic::{ConfigError, suggest_key};
use chatscreen_config::model::ChatscreenConfig;
use chatscreen_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"
session_secret = "0123456789abcdef0123456789abcdef"

[storage]
database_path = "/tmp/chat.db"
wal_mode = false

[gemini]
api_key = "AIza-test"
model = "gemini-1.5-pro"
timeout_secs = 10

[uploads]
directory = "/tmp/uploads"
allowed_extensions = ["png", "gif"]
max_bytes = 1024
describe_images = true

[auth]
hash_memory_cost = 4096
hash_iterations = 3
hash_parallelism = 1

[conversation]
default_username = "Guest"
generation_timeout_secs = 5
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/chat.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test"));
    assert_eq!(config.gemini.model, "gemini-1.5-pro");
    assert_eq!(config.gemini.timeout_secs, 10);
    assert_eq!(config.uploads.allowed_extensions, vec!["png", "gif"]);
    assert_eq!(config.uploads.max_bytes, 1024);
    assert!(config.uploads.describe_images);
    assert_eq!(config.auth.hash_memory_cost, 4096);
    assert_eq!(config.conversation.default_username, "Guest");
    assert_eq!(config.conversation.generation_timeout_secs, 5);
}

#[test]
fn unknown_field_in_server_is_rejected() {
    let toml = r#"
[server]
prot = 9000
"#;

    let err = load_config_from_str(toml).expect_err("unknown key should fail");
    assert!(err.to_string().contains("prot"), "got: {err}");
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;

    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.log_level, "info");
    assert!(config.server.session_secret.is_none());
    assert_eq!(config.server.session_ttl_secs, 86_400);
    assert!(config.storage.wal_mode);
    assert!(config.storage.database_path.ends_with("chatscreen.db"));
    assert!(config.gemini.api_key.is_none());
    assert_eq!(config.gemini.model, "gemini-1.5-flash-latest");
    assert_eq!(
        config.gemini.api_base_url,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(config.uploads.directory, "uploads");
    assert_eq!(
        config.uploads.allowed_extensions,
        vec!["png", "jpg", "jpeg", "gif"]
    );
    assert_eq!(config.uploads.max_bytes, 16 * 1024 * 1024);
    assert!(!config.uploads.describe_images);
    assert_eq!(config.conversation.default_username, "Anonymous");
}

/// Env overrides arrive as dotted keys; simulate them with a tuple provider.
#[test]
fn dotted_override_sets_gemini_api_key() {
    let config: ChatscreenConfig = Figment::new()
        .merge(Serialized::defaults(ChatscreenConfig::default()))
        .merge(Toml::string("[gemini]\nmodel = \"from-toml\"\n"))
        .merge(("gemini.api_key", "from-env"))
        .extract()
        .expect("override should merge");

    assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
    assert_eq!(config.gemini.model, "from-toml");
}

#[test]
fn partial_section_keeps_other_defaults() {
    let config = load_config_from_str("[server]\nport = 8080\n").expect("should parse");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
fn suggestion_for_common_typos() {
    let server = &["host", "port", "log_level", "session_secret", "session_ttl_secs"];
    assert_eq!(suggest_key("hots", server), Some("host".to_string()));

    let uploads = &["directory", "allowed_extensions", "max_bytes", "describe_images"];
    assert_eq!(
        suggest_key("max_byte", uploads),
        Some("max_bytes".to_string())
    );
}

#[test]
fn diagnostic_unknown_key_carries_suggestion() {
    let toml = "[server]\nprot = 9000\n";
    let errors = load_and_validate_str(toml).expect_err("should fail");

    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "prot"
                && suggestion.as_deref() == Some("port")
                && valid_keys.contains("session_secret")
        })
    });
    assert!(found, "expected UnknownKey for `prot`, got: {errors:?}");
}

#[test]
fn diagnostic_invalid_type() {
    let toml = "[server]\nport = \"eighty\"\n";
    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "api_kye".to_string(),
        suggestion: Some("api_key".to_string()),
        valid_keys: "api_key, model, api_base_url, timeout_secs".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("did you mean `api_key`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("api_kye"));
}

#[test]
fn load_and_validate_str_accepts_valid_config() {
    let config = load_and_validate_str("[conversation]\ndefault_username = \"Guest\"\n")
        .expect("should validate");
    assert_eq!(config.conversation.default_username, "Guest");
}

#[test]
fn load_and_validate_str_reports_semantic_errors() {
    let errors = load_and_validate_str("[uploads]\nallowed_extensions = [\"exe\"]\n")
        .expect_err("exe is not an image type");
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
fn load_and_validate_path_reads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chatscreen.toml");
    std::fs::write(&path, "[server]\nport = 9100\n").expect("write");

    let config = load_and_validate_path(&path).expect("should load");
    assert_eq!(config.server.port, 9100);
}

#[test]
fn redacted_hides_secrets() {
    let mut config = ChatscreenConfig::default();
    config.gemini.api_key = Some("AIza-secret".to_string());
    config.server.session_secret = Some("s".repeat(40));

    let shown = toml::to_string(&config.redacted()).expect("serialize");
    assert!(!shown.contains("AIza-secret"));
    assert!(shown.contains("[redacted]"));
}
