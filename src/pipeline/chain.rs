//! Target chain: Discovery Source -> Rule Applier -> Sink for one root

use super::{
    ChainStats, DiscoverySource, FileError, MigrateError, RuleApplier, Sink, Stage,
    StatsCollector,
};
use crate::parallel::CancellationToken;
use crate::rules::RuleSet;
use crate::shared::NameMatcher;
use crossbeam::channel::bounded;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One root directory plus everything needed to migrate it
#[derive(Debug, Clone)]
pub struct Target {
    pub root: PathBuf,
    pub rules: Arc<RuleSet>,
    pub matcher: Arc<NameMatcher>,
    /// Queue capacity and worker count of every stage
    pub concurrency: usize,
    pub follow_symlinks: bool,
}

/// Terminal result of a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    Succeeded,
    Failed(String),
    Cancelled,
}

/// `Idle -> Running -> Finished(outcome)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainState {
    Idle,
    Running,
    Finished(TargetOutcome),
}

/// What happened to one target
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub root: PathBuf,
    pub outcome: TargetOutcome,
    pub stats: ChainStats,
    /// Per-file failures, sorted by path
    pub failures: Vec<FileError>,
    pub duration: Duration,
}

impl TargetReport {
    pub fn is_success(&self) -> bool {
        self.outcome == TargetOutcome::Succeeded
    }

    /// Human-readable reason for a failed or cancelled target
    pub fn reason(&self) -> Option<String> {
        match &self.outcome {
            TargetOutcome::Succeeded => None,
            TargetOutcome::Failed(reason) => Some(reason.clone()),
            TargetOutcome::Cancelled => Some("cancelled".to_string()),
        }
    }
}

pub struct TargetChain {
    target: Target,
    state: ChainState,
}

impl TargetChain {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            state: ChainState::Idle,
        }
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Run the three stages to completion. Chains are not retried: a second
    /// call reports a failure without touching the tree.
    pub fn run(&mut self, cancel: &CancellationToken) -> TargetReport {
        let started = Instant::now();
        let stats = StatsCollector::new();

        if self.state != ChainState::Idle {
            tracing::warn!("Chain for {} has already run", self.target.root.display());
            return TargetReport {
                root: self.target.root.clone(),
                outcome: TargetOutcome::Failed("chain has already run".to_string()),
                stats: ChainStats::default(),
                failures: Vec::new(),
                duration: started.elapsed(),
            };
        }

        self.state = ChainState::Running;
        tracing::info!("Migrating {}", self.target.root.display());

        let outcome = settle(self.drive(&stats, cancel), &stats, cancel);

        self.state = ChainState::Finished(outcome.clone());
        let report = TargetReport {
            root: self.target.root.clone(),
            outcome,
            stats: stats.snapshot(),
            failures: stats.take_failures(),
            duration: started.elapsed(),
        };
        tracing::info!(
            "Finished {} ({:?}, {} written, {} failed)",
            report.root.display(),
            report.outcome,
            report.stats.files_written,
            report.stats.files_failed
        );
        report
    }

    fn drive(&self, stats: &StatsCollector, cancel: &CancellationToken) -> Result<(), MigrateError> {
        let target = &self.target;
        if !target.root.is_dir() {
            return Err(MigrateError::InvalidRoot {
                root: target.root.clone(),
            });
        }

        let width = target.concurrency.max(1);
        let (source_tx, applier_rx) = bounded(width);
        let (applier_tx, sink_rx) = bounded(width);

        let source = DiscoverySource::new(target.root.clone(), width, target.matcher.clone())
            .follow_symlinks(target.follow_symlinks);
        let applier = RuleApplier::new(target.rules.clone(), width);
        let sink = Sink::new(width);

        let (discovered, applied, sunk) = crossbeam::thread::scope(|s| {
            let discovery = s.spawn(|_| source.run(source_tx, stats, cancel));
            let rules = s.spawn(|_| applier.run(applier_rx, applier_tx, stats, cancel));
            let sunk = sink.run(sink_rx, stats, cancel);

            let panicked = |stage| MigrateError::WorkerPanic { stage };
            (
                discovery.join().map_err(|_| panicked(Stage::Discovery)),
                rules.join().map_err(|_| panicked(Stage::Apply)),
                sunk,
            )
        })
        .map_err(|_| MigrateError::WorkerPanic { stage: Stage::Chain })?;

        let matched = discovered??;
        applied??;
        sunk?;

        tracing::debug!("{}: {} matching file(s)", target.root.display(), matched);
        Ok(())
    }
}

/// A chain is only `Cancelled` when cancellation actually left files
/// unprocessed; one that finished before the signal keeps its real outcome.
fn settle(
    result: Result<(), MigrateError>,
    stats: &StatsCollector,
    cancel: &CancellationToken,
) -> TargetOutcome {
    match result {
        Err(e) => TargetOutcome::Failed(e.to_string()),
        Ok(()) if cancel.is_cancelled() && !stats.is_complete() => TargetOutcome::Cancelled,
        Ok(()) if stats.has_failures() => TargetOutcome::Failed(format!(
            "{} file(s) could not be migrated",
            stats.snapshot().files_failed
        )),
        Ok(()) => TargetOutcome::Succeeded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use std::fs;
    use tempfile::TempDir;

    fn target(root: PathBuf, concurrency: usize) -> Target {
        Target {
            root,
            rules: Arc::new(RuleSet::builtin()),
            matcher: Arc::new(NameMatcher::new(&["*.json", "*.tmpl"]).unwrap()),
            concurrency,
            follow_symlinks: false,
        }
    }

    #[test]
    fn test_chain_migrates_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("settings")).unwrap();
        fs::write(
            root.join("krakend.json"),
            r#"{"extra_config": {"github.com/devopsfaith/krakend-etcd": {}}}"#,
        )
        .unwrap();
        fs::write(root.join("settings/cors.tmpl"), r#""github_com/devopsfaith/krakend-cors""#).unwrap();
        fs::write(root.join("notes.txt"), "github.com/devopsfaith/krakend-etcd").unwrap();

        let mut chain = TargetChain::new(target(root.to_path_buf(), 4));
        assert_eq!(chain.state(), &ChainState::Idle);

        let report = chain.run(&CancellationToken::new());
        assert!(report.is_success(), "{:?}", report.outcome);
        assert_eq!(chain.state(), &ChainState::Finished(TargetOutcome::Succeeded));
        assert_eq!(report.stats.files_matched, 2);
        assert_eq!(report.stats.files_written, 2);
        assert_eq!(report.stats.files_changed, 2);

        assert_eq!(
            fs::read_to_string(root.join("krakend.json")).unwrap(),
            r#"{"extra_config": {"---- THE ETCD COMPONENT IS NO LONGER SUPPORTED ----": {}}}"#
        );
        assert_eq!(fs::read_to_string(root.join("settings/cors.tmpl")).unwrap(), r#""security/cors""#);
        assert_eq!(
            fs::read_to_string(root.join("notes.txt")).unwrap(),
            "github.com/devopsfaith/krakend-etcd"
        );
    }

    #[test]
    fn test_chain_rejects_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let mut chain = TargetChain::new(target(temp_dir.path().join("absent"), 2));
        let report = chain.run(&CancellationToken::new());

        assert!(matches!(report.outcome, TargetOutcome::Failed(ref reason) if reason.contains("not a directory")));
    }

    #[test]
    fn test_chain_does_not_run_twice() {
        let temp_dir = TempDir::new().unwrap();
        let mut chain = TargetChain::new(target(temp_dir.path().to_path_buf(), 1));
        assert!(chain.run(&CancellationToken::new()).is_success());

        let second = chain.run(&CancellationToken::new());
        assert!(!second.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn test_per_file_failure_fails_target_but_not_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.json"), "whitelist").unwrap();
        std::os::unix::fs::symlink(root.join("missing"), root.join("b.json")).unwrap();
        fs::write(root.join("c.json"), "blacklist").unwrap();

        let mut chain = TargetChain::new(target(root.to_path_buf(), 2));
        let report = chain.run(&CancellationToken::new());

        assert!(matches!(report.outcome, TargetOutcome::Failed(_)));
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("b.json"));
        assert_eq!(fs::read_to_string(root.join("a.json")).unwrap(), "allow");
        assert_eq!(fs::read_to_string(root.join("c.json")).unwrap(), "deny");
        // the dangling link was not turned into a regular file
        assert!(fs::symlink_metadata(root.join("b.json")).unwrap().file_type().is_symlink());
        assert!(!root.join("missing").exists());
    }

    #[test]
    fn test_non_utf8_file_is_migrated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("legacy.json");
        fs::write(&path, b"{\"whitelist\": \"caf\xE9\"}").unwrap();

        let mut chain = TargetChain::new(target(temp_dir.path().to_path_buf(), 2));
        let report = chain.run(&CancellationToken::new());

        assert!(report.is_success(), "{:?}", report.outcome);
        assert_eq!(fs::read(&path).unwrap(), b"{\"allow\": \"caf\xE9\"}");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_migrated_through_the_link() {
        let temp_dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let real = outside.path().join("real.json");
        fs::write(&real, "whitelist").unwrap();
        std::os::unix::fs::symlink(&real, temp_dir.path().join("link.json")).unwrap();

        let mut chain = TargetChain::new(target(temp_dir.path().to_path_buf(), 2));
        let report = chain.run(&CancellationToken::new());

        assert!(report.is_success(), "{:?}", report.outcome);
        assert_eq!(report.stats.files_matched, 1);
        assert_eq!(fs::read_to_string(&real).unwrap(), "allow");
        assert!(
            fs::symlink_metadata(temp_dir.path().join("link.json"))
                .unwrap()
                .file_type()
                .is_symlink()
        );
    }

    #[test]
    fn test_cancelled_chain_leaves_files_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for i in 0..20 {
            fs::write(root.join(format!("{i}.json")), "whitelist").unwrap();
        }

        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut chain = TargetChain::new(target(root.to_path_buf(), 3));
        let report = chain.run(&cancel);

        assert_eq!(report.outcome, TargetOutcome::Cancelled);
        assert_eq!(report.stats.files_written, 0);
        for i in 0..20 {
            assert_eq!(fs::read_to_string(root.join(format!("{i}.json"))).unwrap(), "whitelist");
        }
    }

    #[test]
    fn test_cancel_mid_run_leaves_every_file_whole() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let original = "{\"whitelist\": [\"/admin\"]}\n".repeat(32 * 1024);
        let migrated = "{\"allow\": [\"/admin\"]}\n".repeat(32 * 1024);
        for i in 0..200 {
            fs::write(root.join(format!("{i:03}.json")), &original).unwrap();
        }

        let cancel = CancellationToken::new();
        let remote = cancel.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            remote.cancel();
        });

        let started = Instant::now();
        let mut chain = TargetChain::new(target(root.to_path_buf(), 4));
        let report = chain.run(&cancel);
        let elapsed = started.elapsed();
        canceller.join().unwrap();

        assert_eq!(report.outcome, TargetOutcome::Cancelled);
        assert!(elapsed < Duration::from_secs(30), "took {:?}", elapsed);
        assert!(report.stats.files_written < 200);

        let mut rewritten = 0;
        for i in 0..200 {
            let content = fs::read_to_string(root.join(format!("{i:03}.json"))).unwrap();
            if content == migrated {
                rewritten += 1;
            } else {
                assert_eq!(content, original, "{i:03}.json is partially migrated");
            }
        }
        assert_eq!(rewritten, report.stats.files_written);
    }

    #[test]
    fn test_chain_finished_before_cancel_keeps_its_outcome() {
        let cancel = CancellationToken::new();
        let stats = StatsCollector::new();
        stats.increment_files_matched();
        stats.increment_files_written();
        cancel.cancel();
        assert_eq!(settle(Ok(()), &stats, &cancel), TargetOutcome::Succeeded);

        // a matched file that never reached the sink
        stats.increment_files_matched();
        assert_eq!(settle(Ok(()), &stats, &cancel), TargetOutcome::Cancelled);
    }

    #[test]
    fn test_concurrency_does_not_change_results() {
        let rules = Arc::new(RuleSet::new(vec![
            Rule::new("maxErrors", "max_errors"),
            Rule::new("max_errors", "max_errors_total"),
        ]));

        let mut outputs = Vec::new();
        for concurrency in [1, 8] {
            let temp_dir = TempDir::new().unwrap();
            let root = temp_dir.path();
            for i in 0..40 {
                let dir = root.join(format!("group{}", i % 5));
                fs::create_dir_all(&dir).unwrap();
                fs::write(dir.join(format!("{i}.json")), format!("{{\"maxErrors\": {i}}}")).unwrap();
            }

            let mut chain = TargetChain::new(Target {
                rules: rules.clone(),
                ..target(root.to_path_buf(), concurrency)
            });
            assert!(chain.run(&CancellationToken::new()).is_success());

            let mut contents = Vec::new();
            for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
                let entry = entry.unwrap();
                if entry.file_type().is_file() {
                    let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
                    contents.push((relative, fs::read_to_string(entry.path()).unwrap()));
                }
            }
            outputs.push(contents);
        }

        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0].len(), 40);
        assert!(outputs[0].iter().all(|(_, c)| c.contains("max_errors_total")));
    }
}
