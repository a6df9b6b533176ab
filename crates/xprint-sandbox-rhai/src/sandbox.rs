//! Rhai-backed receipt interpreter sandbox.
//!
//! Provides a capability-scoped script environment with:
//! - No module loading and no `eval`
//! - Resource limits (call depth, string/array/map size, expression depth)
//! - Strict variables, so unknown names fail at compile time
//! - A progress hook that aborts evaluation once the deadline passes or the
//!   caller raises the cancel flag

use std::time::Instant;

use rhai::module_resolvers::DummyModuleResolver;
use rhai::{Dynamic, Engine, EvalAltResult, Scope, AST};
use serde::{Deserialize, Serialize};

use xprint_types::sandbox::*;

use crate::builtins;
use crate::prelude;

/// Operations between wall-clock checks in the progress hook.
const CLOCK_CHECK_INTERVAL: u64 = 128;

/// Engine resource limits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptLimits {
    pub max_call_levels: usize,
    /// Max string length (bytes)
    pub max_string_size: usize,
    pub max_array_size: usize,
    pub max_map_size: usize,
    /// Expression nesting depth at global level
    pub max_expr_depth: usize,
    /// Expression nesting depth inside functions
    pub max_function_expr_depth: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_call_levels: 64,
            max_string_size: 64 * 1024,
            max_array_size: 10_000,
            max_map_size: 10_000,
            max_expr_depth: 64,
            max_function_expr_depth: 32,
        }
    }
}

/// Receipt interpreter sandbox using rhai
pub struct RhaiSandbox {
    limits: ScriptLimits,
    compiler: Engine,
}

impl RhaiSandbox {
    pub fn new(limits: ScriptLimits) -> Self {
        let compiler = build_engine(&limits);
        Self { limits, compiler }
    }

    pub fn limits(&self) -> &ScriptLimits {
        &self.limits
    }

    /// A fresh engine per invocation so the progress hook can carry this
    /// call's deadline and cancel flag.
    fn runtime_engine(&self, deadline: Instant, cancel: CancelFlag) -> Engine {
        let mut engine = build_engine(&self.limits);
        engine.on_progress(move |ops| {
            if cancel.is_cancelled() {
                return Some(Dynamic::UNIT);
            }
            if ops % CLOCK_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                cancel.cancel();
                return Some(Dynamic::UNIT);
            }
            None
        });
        engine
    }
}

impl Default for RhaiSandbox {
    fn default() -> Self {
        Self::new(ScriptLimits::default())
    }
}

fn build_engine(limits: &ScriptLimits) -> Engine {
    let mut engine = Engine::new();
    engine
        .set_strict_variables(true)
        .set_module_resolver(DummyModuleResolver::new())
        .set_max_call_levels(limits.max_call_levels)
        .set_max_string_size(limits.max_string_size)
        .set_max_array_size(limits.max_array_size)
        .set_max_map_size(limits.max_map_size)
        .set_max_expr_depths(limits.max_expr_depth, limits.max_function_expr_depth);
    engine.disable_symbol("eval");
    builtins::register_all(&mut engine);
    engine
}

/// Scope shape visible at compile time; values are filled per invocation.
fn compile_scope() -> Scope<'static> {
    let mut scope = Scope::new();
    scope.push_dynamic(JSON_STRING, Dynamic::UNIT);
    scope.push_dynamic(PRINTER, Dynamic::UNIT);
    scope.push_dynamic(ORDER, Dynamic::UNIT);
    scope
}

fn runtime_scope(bindings: ScriptBindings) -> Result<Scope<'static>, SandboxError> {
    let order = match bindings.order {
        Some(fixture) => rhai::serde::to_dynamic(&fixture)
            .map_err(|e| SandboxError::Binding(format!("order: {}", e)))?,
        None => Dynamic::UNIT,
    };

    let mut scope = Scope::new();
    scope.push_constant_dynamic(JSON_STRING, Dynamic::from(bindings.json_string));
    scope.push(PRINTER, bindings.printer);
    scope.push_constant_dynamic(ORDER, order);
    Ok(scope)
}

impl ScriptSandbox for RhaiSandbox {
    fn name(&self) -> &str {
        "rhai"
    }

    fn wrap(&self, source: &str) -> String {
        prelude::wrap(source)
    }

    fn wrapper_offset(&self) -> usize {
        prelude::wrapper_offset()
    }

    fn compile(&self, wrapped: &str) -> Result<Artifact, SandboxError> {
        let ast: AST = self
            .compiler
            .compile_with_scope(&compile_scope(), wrapped)
            .map_err(|e| SandboxError::Compilation(e.to_string()))?;
        Ok(Artifact::new(ast))
    }

    fn invoke(
        &self,
        artifact: &Artifact,
        bindings: ScriptBindings,
        deadline: Instant,
        cancel: &CancelFlag,
    ) -> Result<(), SandboxError> {
        let ast = artifact
            .downcast_ref::<AST>()
            .ok_or(SandboxError::ArtifactMismatch)?;

        if cancel.is_cancelled() || Instant::now() >= deadline {
            return Err(SandboxError::Terminated);
        }

        let mut scope = runtime_scope(bindings)?;
        let engine = self.runtime_engine(deadline, cancel.clone());

        engine.run_ast_with_scope(&mut scope, ast).map_err(|err| {
            if cancel.is_cancelled() || matches!(*err, EvalAltResult::ErrorTerminated(..)) {
                SandboxError::Terminated
            } else {
                SandboxError::Execution(err.to_string())
            }
        })
    }
}
