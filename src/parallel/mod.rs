//! Concurrency primitives shared by every pipeline stage
//!
//! The parallel module focuses exclusively on **coordination**:
//!
//! - **Cancellation**: a single [`CancellationToken`] shared by all chains of a run
//! - **Bounded handoff**: [`queue::push`] / [`queue::pop`] over crossbeam channels,
//!   both of which wake up on cancellation
//! - **Sizing**: turning the configured concurrency level into a worker count
//!
//! It knows nothing about files or rules. Stages own their worker pools and
//! use these helpers at every suspension point.
//!
//! ```text
//! ┌──────────────┐  bounded(n)  ┌──────────────┐  bounded(n)  ┌──────────────┐
//! │  Discovery   │─────────────▶│ Rule Applier │─────────────▶│     Sink     │
//! │  n readers   │              │  n workers   │              │  n writers   │
//! └──────────────┘              └──────────────┘              └──────────────┘
//!         ▲                             ▲                             ▲
//!         └─────────────── CancellationToken (shared) ────────────────┘
//! ```

pub mod cancel;
pub mod queue;

pub use cancel::CancellationToken;
pub use queue::Handoff;

/// Concurrency used when none is configured: the host's available parallelism
pub fn default_concurrency() -> usize {
    std::cmp::max(1, num_cpus::get())
}

/// Clamp a user-supplied concurrency level to at least one worker
pub fn clamp_concurrency(requested: i64) -> usize {
    usize::try_from(requested).unwrap_or(0).max(1)
}
