//! Submitter key and display-name checks.

use std::sync::OnceLock;

use regex::Regex;

use super::{ValidationConfig, ValidationError};

const MARKUP_CHARS: &[char] = &['<', '>', '"', '\'', '`', '\\'];

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\p{C}\p{Z}]+").unwrap())
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

pub(super) fn validate_key(raw: &str, config: &ValidationConfig) -> Result<String, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    if raw.chars().count() > config.max_key_length {
        return Err(ValidationError::KeyTooLong {
            max: config.max_key_length,
        });
    }
    if !raw.chars().all(is_key_char) {
        tracing::warn!(key = %raw.escape_debug(), "Invalid key format");
        return Err(ValidationError::InvalidKey(raw.escape_debug().to_string()));
    }
    Ok(raw.to_string())
}

pub(super) fn validate_display_name(raw: Option<&str>, config: &ValidationConfig) -> String {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return "Unknown".to_string();
    };

    let spaced = separator_pattern().replace_all(raw, " ");

    let sanitized: String = spaced
        .chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .take(config.max_display_name_length)
        .collect();
    let sanitized = sanitized.trim();

    if sanitized.is_empty() {
        "Team".to_string()
    } else {
        tracing::debug!(raw = %raw.escape_debug(), sanitized, "Sanitized display name");
        sanitized.to_string()
    }
}
