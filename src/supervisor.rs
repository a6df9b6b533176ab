//! Deadline-bounded execution of cached interpreters.

use std::sync::Arc;
use std::time::{Duration, Instant};

use xprint_types::{
    Alignment, CancelFlag, CapabilityRecorder, Command, FixtureSource, SandboxError,
    ScriptBindings, ScriptSandbox, TextSize,
};

use crate::cache::ProgramCache;
use crate::error::{classify, extract_line, ServiceError};

/// Slack given to the engine's own deadline check before the supervisor's
/// timer gives up on the worker.
const TIMER_GRACE: Duration = Duration::from_millis(250);

pub const BANNER: &str = "═══════════════════════";

/// The block prepended to every successful execution.
pub fn header_commands(key: &str, round: u32) -> Vec<Command> {
    vec![
        Command::align(Alignment::Center),
        Command::text(BANNER),
        Command::style(true, TextSize::Large, false),
        Command::text(format!("TEAM: {}", key)),
        Command::style(true, TextSize::Normal, false),
        Command::text(format!("ROUND: {}", round)),
        Command::text(BANNER),
        Command::feed(1),
        Command::align(Alignment::Left),
    ]
}

pub struct ExecutionSupervisor {
    cache: Arc<ProgramCache>,
    sandbox: Arc<dyn ScriptSandbox>,
    fixtures: Arc<dyn FixtureSource>,
    timeout: Duration,
}

impl ExecutionSupervisor {
    pub fn new(
        cache: Arc<ProgramCache>,
        sandbox: Arc<dyn ScriptSandbox>,
        fixtures: Arc<dyn FixtureSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            cache,
            sandbox,
            fixtures,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the key's cached interpreter once against `payload` and the
    /// round's order. Returns the header followed by everything the
    /// interpreter recorded, or a classified error with no commands.
    pub async fn execute(
        &self,
        key: &str,
        payload: &str,
        round: u32,
    ) -> Result<Vec<Command>, ServiceError> {
        let program = self
            .cache
            .get(key)
            .ok_or_else(|| ServiceError::NotFound(key.to_string()))?;

        let recorder = CapabilityRecorder::new();
        let bindings = ScriptBindings {
            json_string: payload.to_string(),
            printer: recorder.clone(),
            order: self.fixtures.get_fixture(round),
        };

        let started = Instant::now();
        let deadline = started.checked_add(self.timeout).ok_or_else(|| {
            ServiceError::Internal(format!("execution timeout {:?} is out of range", self.timeout))
        })?;
        let cancel = CancelFlag::new();

        let sandbox = self.sandbox.clone();
        let worker_cancel = cancel.clone();
        let task = tokio::task::spawn_blocking(move || {
            sandbox.invoke(&program.artifact, bindings, deadline, &worker_cancel)
        });

        let budget = self.timeout.saturating_add(TIMER_GRACE);
        let outcome = match tokio::time::timeout(budget, task).await {
            Err(_) => {
                cancel.cancel();
                tracing::error!(key = %key, round, "Execution timeout, worker abandoned");
                return Err(ServiceError::Timeout(self.timeout));
            }
            Ok(Err(join_err)) => {
                tracing::error!(key = %key, error = %join_err, "Execution worker failed");
                return Err(ServiceError::Internal(join_err.to_string()));
            }
            Ok(Ok(outcome)) => outcome,
        };

        match outcome {
            Ok(()) => {}
            Err(SandboxError::Terminated) => {
                tracing::error!(key = %key, round, "Execution timeout");
                return Err(ServiceError::Timeout(self.timeout));
            }
            Err(SandboxError::Execution(message)) => {
                let kind = classify(&message);
                let line = extract_line(&message, self.sandbox.wrapper_offset());
                tracing::warn!(key = %key, round, ?kind, ?line, "Interpreter runtime error");
                return Err(ServiceError::Runtime {
                    kind,
                    message,
                    line,
                });
            }
            Err(other) => {
                tracing::error!(key = %key, error = %other, "Sandbox failure");
                return Err(ServiceError::Internal(other.to_string()));
            }
        }

        let mut commands = header_commands(key, round);
        commands.extend(recorder.get_commands());
        tracing::info!(
            key = %key,
            round,
            commands = commands.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Execution complete"
        );
        Ok(commands)
    }
}
