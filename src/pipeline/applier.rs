//! Rule Applier: runs the ordered rule list over every unit

use super::{MigrateError, Stage, StatsCollector, WorkUnit};
use crate::parallel::{CancellationToken, Handoff, queue};
use crate::rules::RuleSet;
use crossbeam::channel::{Receiver, Sender};
use std::sync::Arc;

pub struct RuleApplier {
    rules: Arc<RuleSet>,
    workers: usize,
}

impl RuleApplier {
    pub fn new(rules: Arc<RuleSet>, workers: usize) -> Self {
        Self {
            rules,
            workers: workers.max(1),
        }
    }

    /// Transform units until `input` is closed and drained.
    ///
    /// Workers only borrow `output`; it is dropped here, once, after every
    /// worker has been joined.
    pub fn run(
        &self,
        input: Receiver<WorkUnit>,
        output: Sender<WorkUnit>,
        stats: &StatsCollector,
        cancel: &CancellationToken,
    ) -> Result<(), MigrateError> {
        crossbeam::thread::scope(|s| {
            for worker_id in 0..self.workers {
                let input = input.clone();
                let output = &output;
                s.spawn(move |_| self.worker(worker_id, input, output, stats, cancel));
            }
        })
        .map_err(|_| MigrateError::WorkerPanic { stage: Stage::Apply })?;

        drop(output);
        Ok(())
    }

    fn worker(
        &self,
        worker_id: usize,
        input: Receiver<WorkUnit>,
        output: &Sender<WorkUnit>,
        stats: &StatsCollector,
        cancel: &CancellationToken,
    ) {
        while let Some(mut unit) = queue::pop(&input, cancel) {
            tracing::debug!("[rules-{}] processing {}", worker_id, unit.path.display());
            unit.apply(&self.rules);
            stats.increment_files_transformed(unit.changed);

            if queue::push(output, unit, cancel) != Handoff::Delivered {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use crossbeam::channel::bounded;
    use std::path::PathBuf;

    #[test]
    fn test_every_unit_is_transformed_exactly_once() {
        let rules = Arc::new(RuleSet::new(vec![
            Rule::new("blacklist", "deny"),
            Rule::new("deny", "deny_list"),
        ]));
        let applier = RuleApplier::new(rules, 4);
        let stats = StatsCollector::new();
        let cancel = CancellationToken::new();

        let (in_tx, in_rx) = bounded(4);
        let (out_tx, out_rx) = bounded(4);

        let mut results = crossbeam::thread::scope(|s| {
            let run = s.spawn(|_| applier.run(in_rx, out_tx, &stats, &cancel));
            s.spawn(move |_| {
                for i in 0..50 {
                    let unit = WorkUnit::new(PathBuf::from(format!("{i:02}.json")), format!("blacklist {i}"));
                    in_tx.send(unit).unwrap();
                }
            });
            let results: Vec<WorkUnit> = out_rx.iter().collect();
            run.join().unwrap().unwrap();
            results
        })
        .unwrap();

        results.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(results.len(), 50);
        for (i, unit) in results.iter().enumerate() {
            assert_eq!(unit.path, PathBuf::from(format!("{i:02}.json")));
            assert_eq!(unit.content, format!("deny_list {i}").into_bytes());
            assert!(unit.changed);
        }
        assert_eq!(stats.snapshot().files_transformed, 50);
    }

    #[test]
    fn test_output_closes_when_input_closes() {
        let applier = RuleApplier::new(Arc::new(RuleSet::builtin()), 3);
        let stats = StatsCollector::new();
        let cancel = CancellationToken::new();
        let (in_tx, in_rx) = bounded::<WorkUnit>(1);
        let (out_tx, out_rx) = bounded(1);
        drop(in_tx);

        applier.run(in_rx, out_tx, &stats, &cancel).unwrap();
        assert!(out_rx.recv().is_err());
    }
}
