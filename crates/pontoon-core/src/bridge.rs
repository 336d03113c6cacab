//! Blocking entry points for running futures to completion.
//!
//! Each call hands its future to an isolated worker (see `runner`) and blocks
//! the calling thread on the handoff for a bounded window. The caller is never
//! blocked longer than `timeout + join_grace`, whatever the future does.

use std::future::Future;
use std::time::Duration;

use crate::error::{BridgeError, Result};
use crate::handoff::Wait;
use crate::runner::{self, WorkerHandle};

/// Default time budget for a bridged operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default extra window granted for worker teardown after the budget expires.
pub const JOIN_GRACE: Duration = Duration::from_secs(1);

/// Tuning for a bridge call.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Time budget for the operation itself.
    pub timeout: Duration,
    /// Extra window for worker teardown before the thread is abandoned.
    pub join_grace: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            join_grace: JOIN_GRACE,
        }
    }
}

impl BridgeConfig {
    /// Config with the given operation timeout and the default teardown grace.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// The longest a caller can be blocked under this config.
    pub fn wait_window(&self) -> Duration {
        self.timeout + self.join_grace
    }
}

/// Run `future` on an isolated runtime and block until it resolves, with the
/// default timeout.
pub fn call<F>(future: F) -> Result<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    call_with(future, &BridgeConfig::default())
}

/// Run `future` on an isolated runtime and block until it resolves or
/// `timeout` expires.
pub fn call_timeout<F>(future: F, timeout: Duration) -> Result<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    call_with(future, &BridgeConfig::with_timeout(timeout))
}

/// Run `future` on an isolated runtime with explicit tuning.
///
/// The future is cancelled (dropped) on its worker when `timeout` expires;
/// the grace window only covers teardown. A worker wedged in non-cooperative
/// blocking code cannot be cancelled, so once the window elapses its thread
/// is abandoned rather than killed: it is left to finish on its own and its
/// eventual outcome is discarded.
///
/// A future whose output is a `Result` resolves to that `Result` unchanged;
/// `BridgeError` only reports failures of the bridging itself.
pub fn call_with<F>(future: F, config: &BridgeConfig) -> Result<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let WorkerHandle {
        thread,
        outcome,
        name,
    } = runner::spawn_worker(future, config.timeout)?;

    match outcome.wait(config.wait_window()) {
        Wait::Delivered(outcome) => {
            // The worker closes its runtime before delivering, so this join
            // only covers thread exit.
            if thread.join().is_err() {
                tracing::warn!("Worker {} panicked during teardown", name);
            }
            outcome.into_result()
        }
        Wait::Elapsed => {
            tracing::warn!(
                "Worker {} still busy after {:?}; abandoning thread",
                name,
                config.wait_window()
            );
            // Detached, not killed. The thread tears itself down when its
            // blocking operation finishes and the expired budget is observed.
            Err(BridgeError::TimedOut(config.timeout))
        }
        Wait::Disconnected => match thread.join() {
            Ok(()) => Err(BridgeError::MissingOutcome),
            Err(payload) => Err(BridgeError::Panicked(runner::panic_message(
                payload.as_ref(),
            ))),
        },
    }
}
