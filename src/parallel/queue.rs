//! Cancellation-aware operations on bounded crossbeam queues
//!
//! These are the only blocking points of the pipeline: pushing into a full
//! queue and popping from an empty one. Both wake up on cancellation.

use super::CancellationToken;
use crossbeam::channel::{Receiver, Sender, select};

/// Outcome of handing an item to the next stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    Delivered,
    /// The run was cancelled before the item could be queued
    Cancelled,
    /// Every receiver is gone
    Disconnected,
}

/// Push `item`, blocking while the queue is full
pub fn push<T>(queue: &Sender<T>, item: T, cancel: &CancellationToken) -> Handoff {
    if cancel.is_cancelled() {
        return Handoff::Cancelled;
    }

    select! {
        send(queue, item) -> res => match res {
            Ok(()) => Handoff::Delivered,
            Err(_) => Handoff::Disconnected,
        },
        recv(cancel.signal()) -> _ => Handoff::Cancelled,
    }
}

/// Pop the next item, blocking while the queue is empty.
///
/// Returns `None` once the queue is closed and drained, or once the run is
/// cancelled. An item that races with cancellation is discarded before the
/// caller starts any work on it.
pub fn pop<T>(queue: &Receiver<T>, cancel: &CancellationToken) -> Option<T> {
    if cancel.is_cancelled() {
        return None;
    }

    let item = select! {
        recv(queue) -> msg => msg.ok(),
        recv(cancel.signal()) -> _ => None,
    };

    if cancel.is_cancelled() {
        return None;
    }
    item
}
