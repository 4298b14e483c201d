//! # config-migrator - in-place migration of configuration trees
//!
//! Bulk-rewrites configuration files under one or more root directories,
//! replacing deprecated identifiers (module paths, flag names, keyword
//! aliases) with their current names before upgrading the gateway that
//! consumes them.
//!
//! ## Quick Start
//!
//! ```bash
//! # Migrate every *.json and *.tmpl file under ./config
//! config-migrator ./config
//!
//! # Custom patterns, four workers per stage, custom rules
//! config-migrator -p "*.json" -c 4 -m rules.json ./config ./templates
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use config_migrator::parallel::CancellationToken;
//! use config_migrator::pipeline::{Coordinator, RunSettings};
//! use config_migrator::{NameMatcher, RuleSet};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let settings = RunSettings {
//!     rules: Arc::new(RuleSet::builtin()),
//!     matcher: Arc::new(NameMatcher::new(&["*.json"])?),
//!     concurrency: 4,
//!     follow_symlinks: false,
//!     fail_fast: false,
//! };
//! let report = Coordinator::new(settings).run(&[PathBuf::from("config")], &CancellationToken::new())?;
//! assert!(report.is_success());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod parallel;
pub mod pipeline;
pub mod rules;
pub mod shared;

pub use config::MigratorConfig;
pub use rules::{Rule, RuleSet};
pub use shared::NameMatcher;

/// Result type alias for migrator operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
