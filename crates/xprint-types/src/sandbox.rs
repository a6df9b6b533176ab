//! Script sandbox abstraction.
//!
//! A sandbox turns interpreter source into an opaque compiled [`Artifact`]
//! once, then invokes that artifact many times with fresh [`ScriptBindings`].

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::fixture::Fixture;
use crate::recorder::CapabilityRecorder;

/// Name of the binding that carries the raw payload text.
pub const JSON_STRING: &str = "json_string";
/// Name of the binding that carries the capability recorder.
pub const PRINTER: &str = "printer";
/// Name of the binding that carries the round's order, or unit.
pub const ORDER: &str = "order";
/// Entry point every submission must define.
pub const ENTRY_POINT: &str = "interpret";

#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Compilation error: {0}")]
    Compilation(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Execution terminated")]
    Terminated,

    #[error("Artifact was not produced by this sandbox")]
    ArtifactMismatch,

    #[error("Binding error: {0}")]
    Binding(String),
}

/// Compiled program handle. Cheap to clone; the contents are only
/// meaningful to the sandbox that produced them.
#[derive(Clone)]
pub struct Artifact {
    inner: Arc<dyn Any + Send + Sync>,
}

impl Artifact {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact").finish_non_exhaustive()
    }
}

/// The three values visible to an interpreter during one invocation.
#[derive(Debug, Clone)]
pub struct ScriptBindings {
    pub json_string: String,
    pub printer: CapabilityRecorder,
    pub order: Option<Fixture>,
}

/// Shared abort signal checked by the engine while a script runs.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub trait ScriptSandbox: Send + Sync {
    fn name(&self) -> &str;

    /// Surround user source with the prelude and the entry-point call.
    fn wrap(&self, source: &str) -> String;

    /// Number of lines `wrap` inserts before the user's first line.
    fn wrapper_offset(&self) -> usize;

    fn compile(&self, wrapped: &str) -> Result<Artifact, SandboxError>;

    /// Run the artifact once. Blocks the calling thread; must return
    /// [`SandboxError::Terminated`] promptly after `deadline` passes or
    /// `cancel` is raised.
    fn invoke(
        &self,
        artifact: &Artifact,
        bindings: ScriptBindings,
        deadline: Instant,
        cancel: &CancelFlag,
    ) -> Result<(), SandboxError>;
}
