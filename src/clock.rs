use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Wall-clock source for cache and job timestamps (epoch millis).
pub trait TimeProvider: Send + Sync {
    fn now_millis(&self) -> i64;

    fn now_rfc3339(&self) -> String {
        millis_to_rfc3339(self.now_millis())
    }
}

pub fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

// --- Real implementation ---

#[derive(Debug, Default)]
pub struct RealTimeProvider;

impl RealTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for RealTimeProvider {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

// --- Fake implementation ---

/// Settable clock for tests.
#[derive(Debug, Default)]
pub struct FakeTimeProvider {
    millis: AtomicI64,
}

impl FakeTimeProvider {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeProvider for FakeTimeProvider {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
