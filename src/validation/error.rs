use thiserror::Error;

/// Reasons the submission gate rejects input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Key cannot be empty")]
    EmptyKey,
    #[error("Key exceeds maximum length of {max} characters")]
    KeyTooLong { max: usize },
    #[error("Invalid key format: '{0}'")]
    InvalidKey(String),

    #[error("Code cannot be empty")]
    EmptySource,
    #[error("Code exceeds maximum length of {max} characters")]
    SourceTooLong { max: usize, actual: usize },
    #[error("Code contains restricted operations")]
    RestrictedOperation { pattern: String },
    #[error("Code appears to have excessive recursion")]
    ExcessiveRecursion { function: String, calls: usize },
    #[error("Code may contain infinite loops")]
    InfiniteLoop,
    #[error("Interpreter must define fn interpret(json_string, printer, order)")]
    MissingEntryPoint,

    #[error("Commands cannot be empty")]
    NoCommands,
    #[error("Too many print commands: {actual} (max: {max})")]
    TooManyCommands { max: usize, actual: usize },
}
