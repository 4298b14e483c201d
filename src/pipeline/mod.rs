//! Three-stage migration pipeline
//!
//! Each target root gets its own chain:
//!
//! ```text
//! walker ─▶ handoff(n) ─▶ readers ─▶ queue(n) ─▶ rule workers ─▶ queue(n) ─▶ writers
//! ```
//!
//! Stages only communicate through bounded queues, so a slow sink throttles
//! the rule workers, which throttle discovery. Every stage joins its worker
//! pool before dropping its single downstream sender; that drop is the only
//! end-of-stream signal the next stage sees.
//!
//! The [`Coordinator`] fans chains out over several roots and collects their
//! [`TargetReport`]s.

mod applier;
mod chain;
mod coordinator;
mod error;
mod sink;
mod source;
mod stats;
mod unit;

pub use applier::RuleApplier;
pub use chain::{ChainState, Target, TargetChain, TargetOutcome, TargetReport};
pub use coordinator::{Coordinator, RunReport, RunSettings};
pub use error::{FileError, FileErrorKind, MigrateError, Stage};
pub use sink::Sink;
pub use source::DiscoverySource;
pub use stats::{ChainStats, StatsCollector};
pub use unit::WorkUnit;
