use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use xprint_types::Artifact;

use crate::clock::{millis_to_rfc3339, TimeProvider};

/// A compiled interpreter, immutable once stored.
#[derive(Debug)]
pub struct CompiledProgram {
    pub key: String,
    pub source: String,
    pub artifact: Artifact,
    /// Epoch millis
    pub compiled_at: i64,
}

/// Per-key store of compiled interpreters.
///
/// Readers receive an `Arc` snapshot, so a program being executed stays
/// alive even if the key is replaced or removed mid-run.
pub struct ProgramCache {
    programs: DashMap<String, Arc<CompiledProgram>>,
    clock: Arc<dyn TimeProvider>,
}

impl ProgramCache {
    pub fn new(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            programs: DashMap::new(),
            clock,
        }
    }

    /// Store a program, replacing any previous one for the key.
    pub fn put(&self, key: &str, source: &str, artifact: Artifact) -> Arc<CompiledProgram> {
        let program = Arc::new(CompiledProgram {
            key: key.to_string(),
            source: source.to_string(),
            artifact,
            compiled_at: self.clock.now_millis(),
        });
        self.programs.insert(key.to_string(), program.clone());
        program
    }

    pub fn get(&self, key: &str) -> Option<Arc<CompiledProgram>> {
        self.programs.get(key).map(|p| p.value().clone())
    }

    pub fn remove(&self, key: &str) -> bool {
        self.programs.remove(key).is_some()
    }

    /// Point-in-time copy of every entry.
    pub fn list(&self) -> HashMap<String, Arc<CompiledProgram>> {
        self.programs
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    pub fn size(&self) -> usize {
        self.programs.len()
    }

    pub fn clear(&self) {
        self.programs.clear();
    }

    /// `key -> "Compiled at: <RFC 3339>"` for every entry.
    pub fn status(&self) -> HashMap<String, String> {
        self.programs
            .iter()
            .map(|e| {
                (
                    e.key().clone(),
                    format!("Compiled at: {}", millis_to_rfc3339(e.value().compiled_at)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeTimeProvider;

    fn cache_with_clock() -> (ProgramCache, Arc<FakeTimeProvider>) {
        let clock = Arc::new(FakeTimeProvider::new(1_000));
        (ProgramCache::new(clock.clone()), clock)
    }

    #[test]
    fn test_last_write_wins() {
        let (cache, clock) = cache_with_clock();
        cache.put("team", "v1", Artifact::new(1u8));
        clock.advance(10);
        cache.put("team", "v2", Artifact::new(2u8));

        let program = cache.get("team").unwrap();
        assert_eq!(program.source, "v2");
        assert_eq!(program.artifact.downcast_ref::<u8>(), Some(&2));
        assert_eq!(program.compiled_at, 1_010);
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_remove_semantics() {
        let (cache, _) = cache_with_clock();
        cache.put("team", "v1", Artifact::new(()));
        assert!(cache.remove("team"));
        assert!(cache.get("team").is_none());
        assert!(!cache.remove("team"));
    }

    #[test]
    fn test_snapshot_survives_replace_and_remove() {
        let (cache, _) = cache_with_clock();
        cache.put("team", "v1", Artifact::new(()));
        let held = cache.get("team").unwrap();
        cache.put("team", "v2", Artifact::new(()));
        cache.remove("team");
        assert_eq!(held.source, "v1");
    }

    #[test]
    fn test_list_is_point_in_time() {
        let (cache, _) = cache_with_clock();
        cache.put("a", "1", Artifact::new(()));
        let listed = cache.list();
        cache.put("b", "2", Artifact::new(()));
        assert_eq!(listed.len(), 1);
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn test_status_and_clear() {
        let (cache, clock) = cache_with_clock();
        clock.set(0);
        cache.put("a", "1", Artifact::new(()));
        let status = cache.status();
        assert_eq!(status["a"], "Compiled at: 1970-01-01T00:00:00+00:00");
        cache.clear();
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_concurrent_puts_on_distinct_keys() {
        let (cache, _) = cache_with_clock();
        let cache = Arc::new(cache);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        cache.put(&format!("k{}", i), &j.to_string(), Artifact::new(j));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.size(), 8);
        assert_eq!(cache.get("k3").unwrap().source, "49");
    }
}
