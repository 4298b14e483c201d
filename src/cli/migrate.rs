use anyhow::{Context, Result};
use std::sync::Arc;

use super::{Cli, Output};
use crate::config::MigratorConfig;
use crate::parallel::CancellationToken;
use crate::pipeline::{Coordinator, RunReport, RunSettings};
use crate::rules::RuleSet;
use crate::shared::NameMatcher;

pub async fn execute(cli: Cli, output: &Output) -> Result<()> {
    let config = MigratorConfig::load(cli.config.as_deref(), Some(cli.overrides()))?;
    tracing::debug!("Effective configuration: {:?}", config);

    let rules = load_rules(&config, output);

    if cli.list_rules {
        output.header(&format!("Active rules ({})", rules.len()));
        for rule in rules.iter() {
            output.list_item(&rule.to_string());
        }
        return Ok(());
    }

    if rules.is_empty() {
        output.warning("The rule list is empty; files will be rewritten unchanged");
    } else if !rules.is_idempotent() {
        output.warning("Some replacements contain rule patterns; running twice may rewrite them again");
    }

    let matcher = NameMatcher::new(&config.patterns)?;
    let settings = RunSettings {
        rules: Arc::new(rules),
        matcher: Arc::new(matcher),
        concurrency: config.concurrency,
        follow_symlinks: config.follow_symlinks,
        fail_fast: config.fail_fast,
    };

    output.info(&format!(
        "Ready to scan {} target(s) for {} with concurrency {}",
        cli.targets.len(),
        settings.matcher.patterns().join(", "),
        settings.concurrency
    ));

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_signal(cancel.clone()));

    let coordinator = Coordinator::new(settings);
    let targets = cli.targets.clone();
    let token = cancel.clone();
    let report = tokio::task::spawn_blocking(move || coordinator.run(&targets, &token))
        .await
        .context("Migration task terminated unexpectedly")??;
    watcher.abort();

    render_report(&report, output);

    if let Some(failed) = report.first_failure() {
        anyhow::bail!(
            "Migration of {} failed: {}",
            failed.root.display(),
            failed.reason().unwrap_or_default()
        );
    }

    output.success(&format!(
        "Work done: {} file(s) migrated in {:.2}s",
        report.files_written(),
        report.duration.as_secs_f64()
    ));
    Ok(())
}

/// Custom mapping if configured and valid, the built-in table otherwise
fn load_rules(config: &MigratorConfig, output: &Output) -> RuleSet {
    let Some(path) = &config.mapping else {
        return RuleSet::builtin();
    };

    let (rules, fallback) = RuleSet::load_or_builtin(path);
    match fallback {
        Some(e) => output.warning(&format!("{:#}; using the built-in rules instead", e)),
        None => output.info(&format!("Using customized rules from {}", path.display())),
    }
    rules
}

async fn cancel_on_signal(cancel: CancellationToken) {
    let signal = wait_for_signal().await;
    tracing::warn!("Signal intercepted: {}", signal);
    eprintln!("Signal intercepted ({}), finishing in-flight files...", signal);
    cancel.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!("Cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return "SIGINT";
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "Ctrl-C"
}

fn render_report(report: &RunReport, output: &Output) {
    for target in &report.targets {
        let root = target.root.display().to_string();
        let detail = match target.reason() {
            None => format!(
                "{} file(s) written, {} changed ({:.2}s)",
                target.stats.files_written,
                target.stats.files_changed,
                target.duration.as_secs_f64()
            ),
            Some(reason) => reason,
        };
        output.action_result(&root, &detail, target.is_success());

        for failure in &target.failures {
            output.error_detail(&failure.to_string());
        }
        output.verbose(&format!(
            "{}: {} matched, {} read, {} transformed",
            root, target.stats.files_matched, target.stats.files_read, target.stats.files_transformed
        ));
    }

    if report.targets.len() > 1 {
        output.header("Summary");
        output.summary_stats("Targets", report.targets.len());
        output.summary_stats("Files written", report.files_written());
        output.summary_stats("Files failed", report.files_failed());
    }
}
