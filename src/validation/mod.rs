//! Submission validation gate.
//!
//! Every submission passes these checks before the compiler sees it:
//!
//! - **identity**: key charset and length, display-name sanitising
//! - **source**: size, restricted patterns, recursion and loop heuristics
//! - **shape**: the `interpret(json_string, printer, order)` entry point

mod config;
mod error;
mod identity;
mod shape;
mod source;

pub use config::{ValidationConfig, DEFAULT_DENY_LIST};
pub use error::ValidationError;

/// Applies [`ValidationConfig`] to submissions.
#[derive(Debug, Clone, Default)]
pub struct SubmissionValidator {
    config: ValidationConfig,
}

impl SubmissionValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn validate_key(&self, raw: &str) -> Result<String, ValidationError> {
        identity::validate_key(raw, &self.config)
    }

    pub fn validate_display_name(&self, raw: Option<&str>) -> String {
        identity::validate_display_name(raw, &self.config)
    }

    pub fn validate_source(&self, source: &str) -> Result<(), ValidationError> {
        source::validate_source(source, &self.config)
    }

    pub fn validate_shape(&self, source: &str) -> Result<(), ValidationError> {
        shape::validate_shape(source)
    }

    pub fn validate_command_count<T>(&self, commands: &[T]) -> Result<(), ValidationError> {
        shape::validate_command_count(commands, &self.config)
    }
}

// Default-configured shorthands

pub fn validate_key(raw: &str) -> Result<String, ValidationError> {
    identity::validate_key(raw, &ValidationConfig::default())
}

pub fn validate_display_name(raw: Option<&str>) -> String {
    identity::validate_display_name(raw, &ValidationConfig::default())
}

pub fn validate_source(source: &str) -> Result<(), ValidationError> {
    source::validate_source(source, &ValidationConfig::default())
}

pub fn validate_shape(source: &str) -> Result<(), ValidationError> {
    shape::validate_shape(source)
}

pub fn validate_command_count<T>(commands: &[T]) -> Result<(), ValidationError> {
    shape::validate_command_count(commands, &ValidationConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_config_applies() {
        let validator = SubmissionValidator::new(ValidationConfig {
            max_key_length: 4,
            deny_list: vec!["printer.cut_paper".into()],
            ..Default::default()
        });
        assert!(validator.validate_key("abcde").is_err());
        assert!(validator.validate_source("printer.cut_paper();").is_err());
        assert!(validator.validate_source("java.lang.Runtime").is_ok());
    }

    #[test]
    fn test_every_rejection_has_a_reason() {
        let bad_sources = [
            "",
            "ProcessBuilder",
            "loop { }",
            "fn interpret(a, b, c) {}",
        ];
        for source in bad_sources {
            let err = validate_source(source)
                .and_then(|_| validate_shape(source))
                .unwrap_err();
            assert!(!err.to_string().is_empty());
        }
    }
}
