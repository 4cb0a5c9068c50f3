//! Configuration validation

use crate::{AppConfig, ConfigError, Result};
use std::collections::HashSet;

const KNOWN_CONTEXTS: &[&str] = &["task-worklist", "medical-data", "billing", "generic"];
const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the entire application configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if !KNOWN_LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ValidationError::new(
            "logging.level",
            format!(
                "unknown level '{}', expected one of {:?}",
                config.logging.level, KNOWN_LOG_LEVELS
            ),
        ));
    }

    if config.scheduler.max_samples_per_category == 0 {
        errors.push(ValidationError::new(
            "scheduler.max_samples_per_category",
            "must be greater than 0",
        ));
    }

    if config.consistency.window_secs == 0 {
        errors.push(ValidationError::new(
            "consistency.window_secs",
            "must be greater than 0",
        ));
    }

    if config.consistency.max_entries == 0 {
        errors.push(ValidationError::new(
            "consistency.max_entries",
            "must be greater than 0",
        ));
    }

    if config.metrics.enabled {
        if config.metrics.port == 0 {
            errors.push(ValidationError::new(
                "metrics.port",
                "metrics port must be greater than 0",
            ));
        }
        if config.metrics.bind_addr.is_empty() {
            errors.push(ValidationError::new(
                "metrics.bind_addr",
                "bind address is required when metrics are enabled",
            ));
        }
    }

    validate_classification(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        Err(ConfigError::ValidationError(messages.join("; ")))
    }
}

/// Classification extensions must name known contexts and must not place
/// one operation type in both lists for the same context.
fn validate_classification(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let classification = &config.classification;

    for context in classification
        .extra_queue_required
        .keys()
        .chain(classification.extra_bypass_eligible.keys())
    {
        if !KNOWN_CONTEXTS.contains(&context.as_str()) {
            errors.push(ValidationError::new(
                format!("classification.{context}"),
                format!("unknown view context, expected one of {KNOWN_CONTEXTS:?}"),
            ));
        }
    }

    for (context, queue_required) in &classification.extra_queue_required {
        if let Some(bypass) = classification.extra_bypass_eligible.get(context) {
            let queue_set: HashSet<&String> = queue_required.iter().collect();
            for op_type in bypass {
                if queue_set.contains(op_type) {
                    errors.push(ValidationError::new(
                        format!("classification.{context}.{op_type}"),
                        "operation type appears in both extra lists",
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        validate_config(&AppConfig::default()).unwrap();
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut config = AppConfig::default();
        config.consistency.window_secs = 0;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("consistency.window_secs"));
    }

    #[test]
    fn test_rejects_zero_metrics_port_when_enabled() {
        let mut config = AppConfig::default();
        config.metrics.port = 0;

        assert!(validate_config(&config).is_err());

        config.metrics.enabled = false;
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_rejects_unknown_classification_context() {
        let mut config = AppConfig::default();
        config
            .classification
            .extra_queue_required
            .insert("dashboard".to_string(), vec!["refresh".to_string()]);

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("classification.dashboard"));
    }

    #[test]
    fn test_rejects_overlapping_extra_lists() {
        let mut config = AppConfig::default();
        config
            .classification
            .extra_queue_required
            .insert("billing".to_string(), vec!["void-invoice".to_string()]);
        config
            .classification
            .extra_bypass_eligible
            .insert("billing".to_string(), vec!["void-invoice".to_string()]);

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("void-invoice"));
    }

    #[test]
    fn test_collects_multiple_errors() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        config.consistency.max_entries = 0;

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("logging.level"));
        assert!(message.contains("consistency.max_entries"));
    }
}
