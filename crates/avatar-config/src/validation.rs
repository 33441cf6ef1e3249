// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks ranges and formats that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::AvatarConfig;

/// Largest recency window the shell accepts.
pub const MAX_RECENCY_WINDOW: usize = 1000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all collected validation errors (does not fail fast).
pub fn validate_config(config: &AvatarConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::validation("agent.name", "must not be empty"));
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::validation(
            "agent.log_level",
            format!(
                "`{}` is not one of {}",
                config.agent.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    let openai = &config.openai;
    if openai.default_model.trim().is_empty() {
        errors.push(ConfigError::validation(
            "openai.default_model",
            "must not be empty",
        ));
    }

    if !(openai.base_url.starts_with("http://") || openai.base_url.starts_with("https://")) {
        errors.push(ConfigError::validation(
            "openai.base_url",
            format!("`{}` must start with http:// or https://", openai.base_url),
        ));
    }

    if !(0.0..=2.0).contains(&openai.temperature) {
        errors.push(ConfigError::validation(
            "openai.temperature",
            format!("must be between 0.0 and 2.0, got {}", openai.temperature),
        ));
    }

    if openai.max_tokens == 0 {
        errors.push(ConfigError::validation(
            "openai.max_tokens",
            "must be at least 1",
        ));
    }

    if openai.request_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "openai.request_timeout_secs",
            "must be at least 1",
        ));
    }

    let memory = &config.memory;
    if memory.recency_window == 0 || memory.recency_window > MAX_RECENCY_WINDOW {
        errors.push(ConfigError::validation(
            "memory.recency_window",
            format!(
                "must be between 1 and {MAX_RECENCY_WINDOW}, got {}",
                memory.recency_window
            ),
        ));
    }

    if memory.summary_max_chars == Some(0) {
        errors.push(ConfigError::validation(
            "memory.summary_max_chars",
            "must be at least 1 when set",
        ));
    }

    if memory.call_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "memory.call_timeout_secs",
            "must be at least 1",
        ));
    }

    if let Some(model) = &memory.extraction_model
        && model.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "memory.extraction_model",
            "must not be empty when set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error_for(errors: &[ConfigError], wanted: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { key, .. } if key == wanted))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&AvatarConfig::default()).is_ok());
    }

    #[test]
    fn zero_recency_window_fails_validation() {
        let mut config = AvatarConfig::default();
        config.memory.recency_window = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "memory.recency_window"));
    }

    #[test]
    fn oversized_recency_window_fails_validation() {
        let mut config = AvatarConfig::default();
        config.memory.recency_window = MAX_RECENCY_WINDOW + 1;
        assert!(validate_config(&config).is_err());

        config.memory.recency_window = MAX_RECENCY_WINDOW;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = AvatarConfig::default();
        config.openai.default_model = "  ".to_string();
        config.openai.temperature = 3.5;
        config.openai.base_url = "ftp://example.com".to_string();
        config.memory.summary_max_chars = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(has_error_for(&errors, "openai.default_model"));
        assert!(has_error_for(&errors, "openai.temperature"));
        assert!(has_error_for(&errors, "openai.base_url"));
        assert!(has_error_for(&errors, "memory.summary_max_chars"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = AvatarConfig::default();
        config.agent.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "agent.log_level"));
    }

    #[test]
    fn blank_extraction_model_fails_validation() {
        let mut config = AvatarConfig::default();
        config.memory.extraction_model = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error_for(&errors, "memory.extraction_model"));
    }
}
