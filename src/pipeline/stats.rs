//! Per-chain statistics and failure log

use super::FileError;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Snapshot of one chain's counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainStats {
    pub files_matched: usize,
    pub files_read: usize,
    pub files_transformed: usize,
    pub files_changed: usize,
    pub files_written: usize,
    pub files_failed: usize,
}

/// Thread-safe statistics collector shared by the stages of one chain
#[derive(Debug, Default)]
pub struct StatsCollector {
    files_matched: AtomicUsize,
    files_read: AtomicUsize,
    files_transformed: AtomicUsize,
    files_changed: AtomicUsize,
    files_written: AtomicUsize,
    /// Traversal stopped before visiting every entry
    interrupted: AtomicBool,
    failures: Mutex<Vec<FileError>>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_files_matched(&self) {
        self.files_matched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_read(&self) {
        self.files_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_transformed(&self, changed: bool) {
        self.files_transformed.fetch_add(1, Ordering::Relaxed);
        if changed {
            self.files_changed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_files_written(&self) {
        self.files_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_interrupted(&self) {
        self.interrupted.store(true, Ordering::Relaxed);
    }

    /// True when the whole tree was walked and every matched file was either
    /// written or recorded as failed
    pub fn is_complete(&self) -> bool {
        if self.interrupted.load(Ordering::Relaxed) {
            return false;
        }
        let settled = self.files_written.load(Ordering::Relaxed) + self.lock_failures().len();
        settled == self.files_matched.load(Ordering::Relaxed)
    }

    /// Record a per-file failure without interrupting the stage
    pub fn record_failure(&self, failure: FileError) {
        tracing::warn!("{}", failure);
        self.lock_failures().push(failure);
    }

    pub fn has_failures(&self) -> bool {
        !self.lock_failures().is_empty()
    }

    /// Take the recorded failures, sorted by path for stable reporting
    pub fn take_failures(&self) -> Vec<FileError> {
        let mut failures = std::mem::take(&mut *self.lock_failures());
        failures.sort_by(|a, b| a.path.cmp(&b.path));
        failures
    }

    pub fn snapshot(&self) -> ChainStats {
        ChainStats {
            files_matched: self.files_matched.load(Ordering::Relaxed),
            files_read: self.files_read.load(Ordering::Relaxed),
            files_transformed: self.files_transformed.load(Ordering::Relaxed),
            files_changed: self.files_changed.load(Ordering::Relaxed),
            files_written: self.files_written.load(Ordering::Relaxed),
            files_failed: self.lock_failures().len(),
        }
    }

    fn lock_failures(&self) -> std::sync::MutexGuard<'_, Vec<FileError>> {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FileErrorKind;
    use std::path::PathBuf;

    #[test]
    fn test_counters_and_failures() {
        let stats = StatsCollector::new();
        stats.increment_files_matched();
        stats.increment_files_matched();
        stats.increment_files_read();
        stats.increment_files_transformed(true);
        stats.increment_files_written();
        stats.record_failure(FileError {
            path: PathBuf::from("b.json"),
            kind: FileErrorKind::Read,
            message: "denied".into(),
        });

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.files_matched, 2);
        assert_eq!(snapshot.files_read, 1);
        assert_eq!(snapshot.files_changed, 1);
        assert_eq!(snapshot.files_written, 1);
        assert_eq!(snapshot.files_failed, 1);
        assert!(stats.has_failures());

        let failures = stats.take_failures();
        assert_eq!(failures.len(), 1);
        assert!(!stats.has_failures());
    }

    #[test]
    fn test_completeness() {
        let stats = StatsCollector::new();
        assert!(stats.is_complete());

        stats.increment_files_matched();
        stats.increment_files_matched();
        assert!(!stats.is_complete());

        stats.increment_files_written();
        stats.record_failure(FileError {
            path: PathBuf::from("a.json"),
            kind: FileErrorKind::Write,
            message: "read-only".into(),
        });
        assert!(stats.is_complete());

        stats.mark_interrupted();
        assert!(!stats.is_complete());
    }
}
