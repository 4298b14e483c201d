//! Sink: writes migrated content back in place

use super::{FileError, MigrateError, Stage, StatsCollector, WorkUnit};
use crate::parallel::{CancellationToken, queue};
use crossbeam::channel::Receiver;

pub struct Sink {
    workers: usize,
}

impl Sink {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Write units until `input` is closed and drained. Returns once every
    /// writer has exited.
    pub fn run(
        &self,
        input: Receiver<WorkUnit>,
        stats: &StatsCollector,
        cancel: &CancellationToken,
    ) -> Result<(), MigrateError> {
        crossbeam::thread::scope(|s| {
            for worker_id in 0..self.workers {
                let input = input.clone();
                s.spawn(move |_| Self::writer(worker_id, input, stats, cancel));
            }
        })
        .map_err(|_| MigrateError::WorkerPanic { stage: Stage::Sink })
    }

    fn writer(
        worker_id: usize,
        input: Receiver<WorkUnit>,
        stats: &StatsCollector,
        cancel: &CancellationToken,
    ) {
        // a unit that has been popped is always written in full
        while let Some(unit) = queue::pop(&input, cancel) {
            tracing::debug!("[writer-{}] updating {}", worker_id, unit.path.display());
            // truncating the existing file keeps its permissions
            match std::fs::write(&unit.path, &unit.content) {
                Ok(()) => stats.increment_files_written(),
                Err(e) => stats.record_failure(FileError::write(unit.path, &e)),
            }
        }
    }
}
