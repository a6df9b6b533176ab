pub mod builtins;
pub mod prelude;
pub mod sandbox;

pub use sandbox::{RhaiSandbox, ScriptLimits};

// Re-export rhai for consumers that need direct access
pub use rhai;
