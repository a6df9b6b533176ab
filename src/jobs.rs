use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::clock::TimeProvider;

/// Compile job lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Received,
    Compiling,
    Success,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub status: JobStatus,
    /// Epoch millis
    pub received_at: i64,
    /// Epoch millis
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Latest compile job per key. Execution never touches it.
pub struct JobTracker {
    jobs: DashMap<String, Job>,
    clock: Arc<dyn TimeProvider>,
}

impl JobTracker {
    pub fn new(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            jobs: DashMap::new(),
            clock,
        }
    }

    /// Start a fresh job for the key, replacing any previous one.
    pub fn record_received(&self, key: &str, display_name: Option<&str>) {
        let now = self.clock.now_millis();
        self.jobs.insert(
            key.to_string(),
            Job {
                key: key.to_string(),
                display_name: display_name.map(str::to_string),
                status: JobStatus::Received,
                received_at: now,
                updated_at: now,
                error: None,
            },
        );
    }

    /// No-op when the key has no job.
    pub fn update_status(&self, key: &str, status: JobStatus, error: Option<String>) {
        if let Some(mut job) = self.jobs.get_mut(key) {
            job.status = status;
            job.updated_at = self.clock.now_millis();
            job.error = error;
        }
    }

    pub fn get(&self, key: &str) -> Option<Job> {
        self.jobs.get(key).map(|j| j.value().clone())
    }

    pub fn list_all(&self) -> HashMap<String, Job> {
        self.jobs
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Most recently received first.
    pub fn list_recent(&self, limit: usize) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.iter().map(|e| e.value().clone()).collect();
        jobs.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        jobs.truncate(limit);
        jobs
    }

    /// Drop jobs whose last update predates `now - max_age`. Returns the
    /// number removed.
    pub fn prune(&self, max_age: Duration) -> usize {
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        let cutoff = self.clock.now_millis().saturating_sub(max_age_ms);
        let before = self.jobs.len();
        self.jobs.retain(|_, job| job.updated_at >= cutoff);
        let removed = before.saturating_sub(self.jobs.len());
        if removed > 0 {
            tracing::debug!(removed, "Pruned old compile jobs");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
