//! Limits and pattern lists for the submission gate.

use serde::{Deserialize, Serialize};

/// Restricted substrings, matched case-insensitively against the source.
pub const DEFAULT_DENY_LIST: &[&str] = &[
    // process execution
    "java.lang.Runtime",
    "ProcessBuilder",
    "getRuntime",
    ".exec(",
    "executeCommand",
    "System.exit",
    "std::process",
    "Command::new",
    // filesystem and network
    "java.io.File",
    "java.nio.file",
    "std::fs",
    "std::net",
    "TcpStream",
    "UdpSocket",
    "socket",
    // reflection
    "reflection",
    "invoke",
    "Method.invoke",
    "Constructor.newInstance",
    // dynamic loading
    "ClassLoader",
    "URLClassLoader",
    "loadLibrary",
    "load(",
    "import ",
    "eval(",
    "dlopen",
    // serialization callbacks
    "finalize(",
    "serialVersionUID",
    "ObjectInputStream",
    "ObjectOutputStream",
    "readObject",
    "writeObject",
    // runtime configuration
    "System.getProperty",
    "System.setProperty",
    "SecurityManager",
    "Unsafe",
    // path traversal
    "../",
    "..\\",
    "%00",
    "\\x00",
    "\\u0000",
    // markup injection
    "javascript:",
    "<script",
    "onclick=",
];

/// Submission gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub max_key_length: usize,
    pub max_display_name_length: usize,
    /// Max source length (characters)
    pub max_source_length: usize,
    /// A routine named more often than this is treated as runaway recursion
    pub max_self_calls: usize,
    pub max_commands: usize,
    pub deny_list: Vec<String>,
    /// Presence of any of these anywhere in the source clears the loop check
    pub escape_keywords: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_key_length: 50,
            max_display_name_length: 15,
            max_source_length: 50_000,
            max_self_calls: 10,
            max_commands: 1000,
            deny_list: DEFAULT_DENY_LIST.iter().map(|s| s.to_string()).collect(),
            escape_keywords: vec!["break".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_config_default() {
        let config = ValidationConfig::default();
        assert_eq!(config.max_key_length, 50);
        assert_eq!(config.max_display_name_length, 15);
        assert_eq!(config.max_source_length, 50_000);
        assert_eq!(config.max_self_calls, 10);
        assert_eq!(config.max_commands, 1000);
        assert_eq!(config.deny_list.len(), DEFAULT_DENY_LIST.len());
        assert_eq!(config.escape_keywords, vec!["break".to_string()]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ValidationConfig = serde_yaml::from_str("max_self_calls: 3").unwrap();
        assert_eq!(config.max_self_calls, 3);
        assert_eq!(config.max_source_length, 50_000);
    }
}
