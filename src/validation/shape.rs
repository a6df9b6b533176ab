use std::sync::OnceLock;

use regex::Regex;

use super::{ValidationConfig, ValidationError};

fn entry_point_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\bfn\s+interpret\s*\(\s*json_string\s*,\s*printer\s*,\s*order\s*\)").unwrap()
    })
}

pub(super) fn validate_shape(source: &str) -> Result<(), ValidationError> {
    if entry_point_pattern().is_match(source) {
        Ok(())
    } else {
        Err(ValidationError::MissingEntryPoint)
    }
}

pub(super) fn validate_command_count<T>(
    commands: &[T],
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    if commands.is_empty() {
        return Err(ValidationError::NoCommands);
    }
    if commands.len() > config.max_commands {
        return Err(ValidationError::TooManyCommands {
            max: config.max_commands,
            actual: commands.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_point_whitespace_tolerant() {
        assert!(validate_shape("fn interpret(json_string, printer, order) {}").is_ok());
        assert!(validate_shape("fn   interpret (\n  json_string ,printer,\n order\n) {}").is_ok());
    }

    #[test]
    fn test_entry_point_required() {
        assert_eq!(
            validate_shape("fn interpret(data, printer, order) {}"),
            Err(ValidationError::MissingEntryPoint)
        );
        assert_eq!(
            validate_shape("fn interpret(json_string, printer) {}"),
            Err(ValidationError::MissingEntryPoint)
        );
        assert_eq!(
            validate_shape("fn main() {}"),
            Err(ValidationError::MissingEntryPoint)
        );
    }

    #[test]
    fn test_command_count_bounds() {
        let config = ValidationConfig::default();
        let none: Vec<u8> = vec![];
        assert_eq!(
            validate_command_count(&none, &config),
            Err(ValidationError::NoCommands)
        );
        assert!(validate_command_count(&vec![0u8; 1000], &config).is_ok());
        let err = validate_command_count(&vec![0u8; 1001], &config).unwrap_err();
        assert_eq!(err.to_string(), "Too many print commands: 1001 (max: 1000)");
    }
}
