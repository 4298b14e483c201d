//! Multi-target fan-out and join

use super::{MigrateError, Stage, Target, TargetChain, TargetReport};
use crate::parallel::CancellationToken;
use crate::rules::RuleSet;
use crate::shared::NameMatcher;
use crossbeam::channel::unbounded;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Settings shared by every target of a run
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub rules: Arc<RuleSet>,
    pub matcher: Arc<NameMatcher>,
    pub concurrency: usize,
    pub follow_symlinks: bool,
    /// Cancel every other chain as soon as one fails
    pub fail_fast: bool,
}

impl RunSettings {
    pub fn target(&self, root: PathBuf) -> Target {
        Target {
            root,
            rules: self.rules.clone(),
            matcher: self.matcher.clone(),
            concurrency: self.concurrency.max(1),
            follow_symlinks: self.follow_symlinks,
        }
    }
}

/// Aggregate of all chains of one invocation
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Reports in completion order
    pub targets: Vec<TargetReport>,
    pub duration: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.targets.iter().all(TargetReport::is_success)
    }

    /// The first failed or cancelled target, in the order they finished
    pub fn first_failure(&self) -> Option<&TargetReport> {
        self.targets.iter().find(|report| !report.is_success())
    }

    pub fn files_written(&self) -> usize {
        self.targets.iter().map(|r| r.stats.files_written).sum()
    }

    pub fn files_failed(&self) -> usize {
        self.targets.iter().map(|r| r.stats.files_failed).sum()
    }
}

pub struct Coordinator {
    settings: RunSettings,
}

impl Coordinator {
    pub fn new(settings: RunSettings) -> Self {
        Self { settings }
    }

    /// Run one chain per root concurrently and wait for all of them
    pub fn run(&self, roots: &[PathBuf], cancel: &CancellationToken) -> Result<RunReport, MigrateError> {
        let started = Instant::now();
        let (report_tx, report_rx) = unbounded::<TargetReport>();

        let targets = crossbeam::thread::scope(|s| {
            for root in roots {
                let report_tx = report_tx.clone();
                let target = self.settings.target(root.clone());
                s.spawn(move |_| {
                    let report = TargetChain::new(target).run(cancel);
                    // the collector outlives every chain
                    let _ = report_tx.send(report);
                });
            }
            drop(report_tx);

            let mut targets = Vec::with_capacity(roots.len());
            for report in report_rx.iter() {
                if !report.is_success() && self.settings.fail_fast && !cancel.is_cancelled() {
                    tracing::warn!(
                        "{} failed, cancelling remaining targets",
                        report.root.display()
                    );
                    cancel.cancel();
                }
                targets.push(report);
            }
            targets
        })
        .map_err(|_| MigrateError::WorkerPanic { stage: Stage::Chain })?;

        Ok(RunReport {
            targets,
            duration: started.elapsed(),
        })
    }
}
