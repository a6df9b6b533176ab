//! Error types for the print service.
//!
//! - [`ServiceError`]: Every failure a compile or execute call can surface.
//! - [`ErrorKind`]: Coarse classification of compiler and runtime messages.

pub mod classify;
pub mod service_error;

pub use classify::{classify, extract_line, ErrorKind};
pub use service_error::ServiceError;

/// Convenience alias for service-level results.
pub type ServiceResult<T> = Result<T, ServiceError>;
