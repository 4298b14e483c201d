//! Discovery Source: directory traversal and file reading
//!
//! A single walker enumerates candidate paths and hands matching ones to a
//! pool of reader workers through a bounded queue sized to the worker count,
//! so traversal never runs far ahead of reading. Readers load each file fully
//! and emit a [`WorkUnit`] downstream.
//!
//! Symlinks to files are always migrated (reads and writes go through the
//! link); symlinked directories are only entered with `follow_symlinks`. A
//! file reachable through several paths is emitted once.

use super::{FileError, MigrateError, Stage, StatsCollector, WorkUnit};
use crate::parallel::{CancellationToken, Handoff, queue};
use crate::shared::NameMatcher;
use crossbeam::channel::{Receiver, Sender, bounded};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

pub struct DiscoverySource {
    root: PathBuf,
    workers: usize,
    matcher: Arc<NameMatcher>,
    follow_symlinks: bool,
}

impl DiscoverySource {
    pub fn new(root: PathBuf, workers: usize, matcher: Arc<NameMatcher>) -> Self {
        Self {
            root,
            workers: workers.max(1),
            matcher,
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Walk the tree and emit one unit per readable matching file.
    ///
    /// `output` is closed (dropped) only after the walker finished and every
    /// reader drained the handoff queue. Returns the number of matched paths.
    pub fn run(
        &self,
        output: Sender<WorkUnit>,
        stats: &StatsCollector,
        cancel: &CancellationToken,
    ) -> Result<usize, MigrateError> {
        let (handoff_tx, handoff_rx) = bounded::<PathBuf>(self.workers);

        let walked = crossbeam::thread::scope(|s| {
            for worker_id in 0..self.workers {
                let paths = handoff_rx.clone();
                let output = &output;
                s.spawn(move |_| self.reader(worker_id, paths, output, stats, cancel));
            }
            drop(handoff_rx);

            // handoff_tx is consumed here; dropping it closes the handoff queue
            self.walk(handoff_tx, stats, cancel)
        })
        .map_err(|_| MigrateError::WorkerPanic {
            stage: Stage::Discovery,
        })?;

        drop(output);
        walked
    }

    fn walk(
        &self,
        handoff: Sender<PathBuf>,
        stats: &StatsCollector,
        cancel: &CancellationToken,
    ) -> Result<usize, MigrateError> {
        let mut matched = 0;
        let mut queued = HashSet::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name();

        for entry in walker {
            if cancel.is_cancelled() {
                tracing::debug!("Traversal of {} cancelled", self.root.display());
                stats.mark_interrupted();
                break;
            }

            let entry = entry.map_err(|source| MigrateError::Traversal {
                root: self.root.clone(),
                source,
            })?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if file_type.is_symlink() && points_to_dir(entry.path()) {
                tracing::debug!("Not entering symlinked directory {}", entry.path().display());
                continue;
            }

            if !self.matcher.matches(&entry.file_name().to_string_lossy()) {
                tracing::trace!("Skipping {}", entry.path().display());
                continue;
            }

            // dangling links keep their own path and fail at read time
            let identity =
                std::fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
            if !queued.insert(identity) {
                tracing::debug!("{} already queued through another path", entry.path().display());
                continue;
            }

            matched += 1;
            stats.increment_files_matched();
            match queue::push(&handoff, entry.into_path(), cancel) {
                Handoff::Delivered => {}
                Handoff::Cancelled | Handoff::Disconnected => break,
            }
        }

        Ok(matched)
    }

    fn reader(
        &self,
        worker_id: usize,
        paths: Receiver<PathBuf>,
        output: &Sender<WorkUnit>,
        stats: &StatsCollector,
        cancel: &CancellationToken,
    ) {
        while let Some(path) = queue::pop(&paths, cancel) {
            tracing::debug!("[reader-{}] reading {}", worker_id, path.display());
            let content = match std::fs::read(&path) {
                Ok(content) => content,
                Err(e) => {
                    stats.record_failure(FileError::read(path, &e));
                    continue;
                }
            };
            stats.increment_files_read();

            if queue::push(output, WorkUnit::new(path, content), cancel) != Handoff::Delivered {
                break;
            }
        }
    }
}

/// Follows the link; broken links are not directories
fn points_to_dir(path: &Path) -> bool {
    std::fs::metadata(path).map(|meta| meta.is_dir()).unwrap_or(false)
}
