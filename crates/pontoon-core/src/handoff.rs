//! One-shot handoff of an execution outcome across a thread boundary.
//!
//! A handoff is a single-writer, single-reader slot: the sender is consumed by
//! delivery, so at most one outcome can ever cross it, and the receiver can
//! wait on it with a bound.

use std::sync::mpsc;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// What happened to a future that was driven to its end.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
    /// The future resolved to a value.
    Completed(T),
    /// The future was cancelled when its time budget expired.
    TimedOut(Duration),
    /// The future panicked; the payload was rendered as a message.
    Panicked(String),
    /// No runtime could be set up to drive the future.
    Runtime(String),
}

impl<T> Outcome<T> {
    /// Translate the outcome into the caller-facing result.
    pub(crate) fn into_result(self) -> Result<T> {
        match self {
            Outcome::Completed(value) => Ok(value),
            Outcome::TimedOut(budget) => Err(BridgeError::TimedOut(budget)),
            Outcome::Panicked(message) => Err(BridgeError::Panicked(message)),
            Outcome::Runtime(message) => Err(BridgeError::Runtime(message)),
        }
    }
}

/// Result of waiting on a handoff.
pub(crate) enum Wait<T> {
    /// The outcome arrived within the window.
    Delivered(Outcome<T>),
    /// The window elapsed with nothing delivered.
    Elapsed,
    /// The sender was dropped without delivering.
    Disconnected,
}

/// Sending half of a handoff. Consumed by delivery.
pub(crate) struct HandoffSender<T> {
    tx: mpsc::SyncSender<Outcome<T>>,
}

impl<T> HandoffSender<T> {
    /// Deliver the outcome, consuming the sender.
    ///
    /// Delivery to a receiver that already stopped waiting is discarded.
    pub(crate) fn deliver(self, outcome: Outcome<T>) {
        if self.tx.send(outcome).is_err() {
            tracing::trace!("Outcome discarded; caller stopped waiting");
        }
    }
}

/// Receiving half of a handoff.
pub(crate) struct HandoffReceiver<T> {
    rx: mpsc::Receiver<Outcome<T>>,
}

impl<T> HandoffReceiver<T> {
    /// Block until the outcome arrives or `window` elapses.
    pub(crate) fn wait(self, window: Duration) -> Wait<T> {
        match self.rx.recv_timeout(window) {
            Ok(outcome) => Wait::Delivered(outcome),
            Err(mpsc::RecvTimeoutError::Timeout) => Wait::Elapsed,
            Err(mpsc::RecvTimeoutError::Disconnected) => Wait::Disconnected,
        }
    }
}

/// Create a connected handoff pair.
pub(crate) fn channel<T>() -> (HandoffSender<T>, HandoffReceiver<T>) {
    // Capacity 1 so delivery never blocks the worker on a slow caller.
    let (tx, rx) = mpsc::sync_channel(1);
    (HandoffSender { tx }, HandoffReceiver { rx })
}
