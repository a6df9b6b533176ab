//! Static screening of interpreter source.
//!
//! These checks are purely textual. They reject benign text that happens to
//! contain a restricted word and accept disguised code that avoids one.

use std::sync::OnceLock;

use regex::Regex;

use super::{ValidationConfig, ValidationError};

fn function_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\bfn\s+(\w+)\s*\(").unwrap())
}

fn unbounded_loop_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"\bloop\s*\{",
            r"\bwhile\s*\(?\s*true\b",
            r"\bwhile\s*\(\s*1\s*\)",
            r"\bfor\s*\(\s*;\s*;\s*\)",
            r"\bdo\s*\{[^}]*\}\s*while\s*\(?\s*true\b",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

pub(super) fn validate_source(source: &str, config: &ValidationConfig) -> Result<(), ValidationError> {
    if source.trim().is_empty() {
        return Err(ValidationError::EmptySource);
    }

    let length = source.chars().count();
    if length > config.max_source_length {
        return Err(ValidationError::SourceTooLong {
            max: config.max_source_length,
            actual: length,
        });
    }

    check_deny_list(source, config)?;
    check_recursion(source, config)?;
    check_unbounded_loops(source, config)?;
    Ok(())
}

fn check_deny_list(source: &str, config: &ValidationConfig) -> Result<(), ValidationError> {
    let lower = source.to_lowercase();
    for pattern in &config.deny_list {
        if lower.contains(&pattern.to_lowercase()) {
            tracing::warn!(pattern = %pattern, "Restricted pattern detected in code");
            return Err(ValidationError::RestrictedOperation {
                pattern: pattern.clone(),
            });
        }
    }
    Ok(())
}

/// Counts every `name(` occurrence of each routine defined with `fn name(`,
/// the definition included.
fn check_recursion(source: &str, config: &ValidationConfig) -> Result<(), ValidationError> {
    for caps in function_pattern().captures_iter(source) {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        let Ok(call) = Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))) else {
            continue;
        };
        let calls = call.find_iter(source).count();
        if calls > config.max_self_calls {
            tracing::warn!(function = name, calls, "Excessive recursion heuristic tripped");
            return Err(ValidationError::ExcessiveRecursion {
                function: name.to_string(),
                calls,
            });
        }
    }
    Ok(())
}

fn check_unbounded_loops(source: &str, config: &ValidationConfig) -> Result<(), ValidationError> {
    let has_escape = config
        .escape_keywords
        .iter()
        .any(|kw| source.contains(kw.as_str()));
    if has_escape {
        return Ok(());
    }
    if unbounded_loop_patterns().iter().any(|re| re.is_match(source)) {
        return Err(ValidationError::InfiniteLoop);
    }
    Ok(())
}
