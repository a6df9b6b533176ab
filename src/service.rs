//! Service facade: compile, cache, execute.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use xprint_sandbox_rhai::RhaiSandbox;
use xprint_types::{Command, FixtureSource, PrinterCommand, SandboxError, ScriptSandbox};

use crate::cache::ProgramCache;
use crate::clock::{RealTimeProvider, TimeProvider};
use crate::config::ServiceConfig;
use crate::error::{classify, extract_line, ServiceError, ServiceResult};
use crate::fixtures::StaticFixtures;
use crate::jobs::{Job, JobStatus, JobTracker};
use crate::notify::{CompileEvent, Notifier, TracingNotifier};
use crate::supervisor::ExecutionSupervisor;
use crate::validation::SubmissionValidator;

/// Display name used for throwaway dry-run compiles.
const DRY_RUN_NAME: &str = "Test Team";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
}

impl CompileResponse {
    pub fn from_result(result: &ServiceResult<()>) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                message: Some("Compilation successful".to_string()),
                error: None,
                line_number: None,
            },
            Err(err) => Self {
                success: false,
                message: None,
                error: Some(err.to_string()),
                line_number: err.line(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<PrinterCommand>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
}

impl ExecuteResponse {
    pub fn from_result(result: &ServiceResult<Vec<Command>>) -> Self {
        match result {
            Ok(commands) => Self {
                success: true,
                commands: Some(commands.iter().map(Command::to_wire).collect()),
                error: None,
                line_number: None,
            },
            Err(err) => Self {
                success: false,
                commands: None,
                error: Some(err.to_string()),
                line_number: err.line(),
            },
        }
    }
}

/// Builder-style wiring for [`PrintService`].
pub struct PrintServiceBuilder {
    config: ServiceConfig,
    clock: Arc<dyn TimeProvider>,
    sandbox: Option<Arc<dyn ScriptSandbox>>,
    fixtures: Arc<dyn FixtureSource>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl PrintServiceBuilder {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            clock: Arc::new(RealTimeProvider::new()),
            sandbox: None,
            fixtures: Arc::new(StaticFixtures::new()),
            notifier: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    pub fn sandbox(mut self, sandbox: Arc<dyn ScriptSandbox>) -> Self {
        self.sandbox = Some(sandbox);
        self
    }

    pub fn fixtures(mut self, fixtures: Arc<dyn FixtureSource>) -> Self {
        self.fixtures = fixtures;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn build(self) -> PrintService {
        let sandbox = self
            .sandbox
            .unwrap_or_else(|| Arc::new(RhaiSandbox::new(self.config.limits.clone())));
        let notifier = self
            .notifier
            .unwrap_or_else(|| default_notifier(&self.config));
        let cache = Arc::new(ProgramCache::new(self.clock.clone()));
        let jobs = Arc::new(JobTracker::new(self.clock));
        let supervisor = ExecutionSupervisor::new(
            cache.clone(),
            sandbox.clone(),
            self.fixtures,
            self.config.execution_timeout(),
        );

        PrintService {
            validator: SubmissionValidator::new(self.config.validation.clone()),
            config: self.config,
            sandbox,
            cache,
            jobs,
            supervisor,
            notifier,
        }
    }
}

#[cfg(feature = "webhook-notify")]
fn default_notifier(config: &ServiceConfig) -> Arc<dyn Notifier> {
    match &config.notify_url {
        Some(url) => Arc::new(crate::notify::WebhookNotifier::new(
            url,
            config.notify_timeout(),
        )),
        None => Arc::new(TracingNotifier),
    }
}

#[cfg(not(feature = "webhook-notify"))]
fn default_notifier(config: &ServiceConfig) -> Arc<dyn Notifier> {
    if config.notify_url.is_some() {
        tracing::warn!("notify_url set but webhook-notify is disabled; logging events instead");
    }
    Arc::new(TracingNotifier)
}

/// Compile-once, run-many receipt interpreter service.
pub struct PrintService {
    config: ServiceConfig,
    validator: SubmissionValidator,
    sandbox: Arc<dyn ScriptSandbox>,
    cache: Arc<ProgramCache>,
    jobs: Arc<JobTracker>,
    supervisor: ExecutionSupervisor,
    notifier: Arc<dyn Notifier>,
}

impl PrintService {
    pub fn new(config: ServiceConfig) -> Self {
        PrintServiceBuilder::new(config).build()
    }

    pub fn builder(config: ServiceConfig) -> PrintServiceBuilder {
        PrintServiceBuilder::new(config)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn cache(&self) -> &ProgramCache {
        &self.cache
    }

    pub fn job_tracker(&self) -> &JobTracker {
        &self.jobs
    }

    /// Validate, compile, and cache a submission under `key`.
    ///
    /// An invalid key is rejected before any job exists. Every other outcome
    /// is recorded on the key's job and announced to the notifier.
    pub async fn compile(
        &self,
        key: &str,
        source: &str,
        display_name: Option<&str>,
    ) -> ServiceResult<()> {
        let key = self.validator.validate_key(key)?;
        let name = self.validator.validate_display_name(display_name);
        self.jobs.record_received(&key, Some(&name));
        tracing::info!(key = %key, name = %name, bytes = source.len(), "Compile requested");

        let gate = self
            .validator
            .validate_source(source)
            .and_then(|_| self.validator.validate_shape(source));
        if let Err(reason) = gate {
            tracing::warn!(key = %key, reason = %reason, "Submission rejected");
            self.fail(&key, &name, reason.to_string());
            return Err(reason.into());
        }

        self.jobs.update_status(&key, JobStatus::Compiling, None);

        let sandbox = self.sandbox.clone();
        let owned = source.to_string();
        let compiled = tokio::task::spawn_blocking(move || sandbox.compile(&sandbox.wrap(&owned)))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))
            .and_then(|r| r.map_err(|e| self.compile_error(e)));

        match compiled {
            Ok(artifact) => {
                self.cache.put(&key, source, artifact);
                self.jobs.update_status(&key, JobStatus::Success, None);
                self.announce(CompileEvent::success(&key, &name));
                tracing::info!(key = %key, "Compilation successful");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Compilation failed");
                self.fail(&key, &name, err.to_string());
                Err(err)
            }
        }
    }

    /// Run the key's cached interpreter against `payload` and the round's
    /// order. Never touches the job tracker.
    pub async fn execute(&self, key: &str, payload: &str, round: u32) -> ServiceResult<Vec<Command>> {
        self.supervisor.execute(key, payload, round).await
    }

    /// Compile under a throwaway key, execute once, then drop the program.
    pub async fn dry_run(&self, source: &str, payload: &str, round: u32) -> ServiceResult<Vec<Command>> {
        let key = format!("test_{}", uuid::Uuid::new_v4().simple());
        self.compile(&key, source, Some(DRY_RUN_NAME)).await?;
        let result = self.execute(&key, payload, round).await;
        self.cache.remove(&key);
        result
    }

    /// Remove one key's program, or every program when `key` is `None`.
    pub fn clear_cache(&self, key: Option<&str>) -> usize {
        match key {
            Some(key) => usize::from(self.cache.remove(key)),
            None => {
                let removed = self.cache.size();
                self.cache.clear();
                removed
            }
        }
    }

    pub fn cache_status(&self) -> HashMap<String, String> {
        self.cache.status()
    }

    pub fn jobs(&self) -> HashMap<String, Job> {
        self.jobs.list_all()
    }

    pub fn recent_jobs(&self, limit: usize) -> Vec<Job> {
        self.jobs.list_recent(limit)
    }

    /// Drop jobs older than the configured retention.
    pub fn prune_jobs(&self) -> usize {
        self.jobs.prune(self.config.job_retention())
    }

    fn compile_error(&self, err: SandboxError) -> ServiceError {
        match err {
            SandboxError::Compilation(message) => ServiceError::Compile {
                kind: classify(&message),
                line: extract_line(&message, self.sandbox.wrapper_offset()),
                message,
            },
            other => ServiceError::Internal(other.to_string()),
        }
    }

    fn fail(&self, key: &str, name: &str, error: String) {
        self.jobs
            .update_status(key, JobStatus::Failed, Some(error.clone()));
        self.announce(CompileEvent::failed(key, name, error));
    }

    /// Fire-and-forget; the caller never waits on or sees a delivery failure.
    fn announce(&self, event: CompileEvent) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            let key = event.team_id.clone();
            if let Err(e) = notifier.notify(event).await {
                tracing::warn!(key = %key, error = %e, "Failed to deliver compile notification");
            }
        });
    }
}
