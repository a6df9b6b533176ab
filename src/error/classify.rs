//! Message-based classification of compiler and runtime errors.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Error classification for compile and runtime failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnresolvedSymbol,
    TypeMismatch,
    Syntax,
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::UnresolvedSymbol => "unresolved symbol",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

const UNRESOLVED_MARKERS: &[&str] = &["not found", "undefined", "unresolved"];
const MISMATCH_MARKERS: &[&str] = &["mismatch", "type incorrect", "data type"];
const SYNTAX_MARKERS: &[&str] = &["syntax", "expecting", "unexpected"];

/// Classify an engine message. Markers are checked case-insensitively, in
/// the order unresolved, mismatch, syntax.
pub fn classify(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

    if has(UNRESOLVED_MARKERS) {
        ErrorKind::UnresolvedSymbol
    } else if has(MISMATCH_MARKERS) {
        ErrorKind::TypeMismatch
    } else if has(SYNTAX_MARKERS) {
        ErrorKind::Syntax
    } else {
        ErrorKind::Other
    }
}

/// The engine's own `(line N, position M)` comes first so that line numbers
/// quoted from inside a message (a bad JSON payload, say) never win.
fn line_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"\(line (\d+), position \d+\)",
            r"line (\d+)",
            r":(\d+):",
            r"Line (\d+)",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

/// Recover a user-relative line number from an engine message.
///
/// The first pattern that matches wins. Lines at or before `offset` belong
/// to the wrapper and yield `None`.
pub fn extract_line(message: &str, offset: usize) -> Option<usize> {
    let line = line_patterns().iter().find_map(|re| {
        re.captures(message)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
    })?;
    line.checked_sub(offset).filter(|l| *l > 0)
}
