//! Scoped bridging that adapts to an already-running runtime.
//!
//! A `BridgeScope` decides once, at construction, how it reaches a runtime:
//! off-runtime callers get a private current-thread runtime, while callers
//! already inside a Tokio runtime get a scope that schedules onto it. The
//! scope can run any number of futures before it drops.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::{Handle, Runtime};

use crate::bridge::{DEFAULT_TIMEOUT, JOIN_GRACE};
use crate::error::{BridgeError, Result};
use crate::handoff::{self, Wait};
use crate::runner;

/// How the scope reaches a runtime.
enum ScopeState {
    /// The scope built its own runtime; dropping the scope shuts it down.
    Owned(Runtime),
    /// The scope attached to the caller's runtime; dropping the scope shuts
    /// down nothing.
    Borrowed(Handle),
}

/// A bridge session that adapts to the caller's runtime state.
///
/// Use this instead of [`crate::call`] when the same caller issues several
/// bridged operations, or when the caller may already be inside a runtime
/// and a nested `block_on` would panic.
pub struct BridgeScope {
    state: ScopeState,
    timeout: Duration,
}

impl BridgeScope {
    /// Scope with the default per-run timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Scope with an explicit per-run timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let state = match Handle::try_current() {
            Ok(handle) => ScopeState::Borrowed(handle),
            Err(_) => {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| BridgeError::Runtime(e.to_string()))?;
                ScopeState::Owned(runtime)
            }
        };
        Ok(Self { state, timeout })
    }

    /// Whether the scope attached to a runtime it does not own.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.state, ScopeState::Borrowed(_))
    }

    /// Run `future` to completion within this scope's timeout.
    ///
    /// On a borrowed runtime the future runs as a task there while the
    /// calling thread sleeps until the outcome arrives. That wait blocks, so
    /// call this only where blocking is allowed (a `spawn_blocking` closure,
    /// for example), never from async code on the runtime itself.
    pub fn run<F>(&self, future: F) -> Result<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        match &self.state {
            ScopeState::Owned(runtime) => runtime
                .block_on(runner::drive(future, self.timeout))
                .into_result(),
            ScopeState::Borrowed(handle) => {
                let (sender, receiver) = handoff::channel();
                let budget = self.timeout;
                let task = handle.spawn(async move {
                    sender.deliver(runner::drive(future, budget).await);
                });

                match receiver.wait(budget + JOIN_GRACE) {
                    Wait::Delivered(outcome) => outcome.into_result(),
                    Wait::Elapsed => {
                        // The task's own budget should have fired first; if
                        // nothing arrived it is wedged, so stop it hard.
                        task.abort();
                        tracing::warn!(
                            "Scoped task still busy after {:?}; aborted",
                            budget + JOIN_GRACE
                        );
                        Err(BridgeError::TimedOut(budget))
                    }
                    Wait::Disconnected => Err(BridgeError::MissingOutcome),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_scope_off_runtime_is_owned() {
        let scope = BridgeScope::new().unwrap();
        assert!(!scope.is_borrowed());
    }

    #[test]
    fn test_owned_scope_runs_futures() {
        let scope = BridgeScope::new().unwrap();
        assert_eq!(scope.run(async { 3 }).unwrap(), 3);
        assert_eq!(scope.run(async { 4 }).unwrap(), 4);
    }

    #[test]
    fn test_owned_scope_times_out() {
        let scope = BridgeScope::with_timeout(Duration::from_millis(50)).unwrap();
        let start = Instant::now();

        let err = scope
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
            })
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_owned_scope_reports_panic() {
        let scope = BridgeScope::new().unwrap();
        let err = scope
            .run(async {
                panic!("scope test panic");
            })
            .unwrap_err();

        assert!(matches!(err, BridgeError::Panicked(m) if m == "scope test panic"));
    }

    #[test]
    fn test_owned_scope_error_passthrough() {
        let scope = BridgeScope::new().unwrap();
        let result = scope
            .run(async { Err::<i32, String>("bad".to_string()) })
            .unwrap();
        assert_eq!(result, Err("bad".to_string()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_scope_inside_runtime_is_borrowed() {
        let value = tokio::task::spawn_blocking(|| {
            let scope = BridgeScope::new().unwrap();
            assert!(scope.is_borrowed());
            scope.run(async { 7 }).unwrap()
        })
        .await
        .unwrap();

        assert_eq!(value, 7);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_borrowed_scope_runs_several_futures() {
        let values = tokio::task::spawn_blocking(|| {
            let scope = BridgeScope::new().unwrap();
            let a = scope.run(async { 1 }).unwrap();
            let b = scope
                .run(async {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    2
                })
                .unwrap();
            (a, b)
        })
        .await
        .unwrap();

        assert_eq!(values, (1, 2));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_borrowed_scope_times_out() {
        tokio::task::spawn_blocking(|| {
            let scope = BridgeScope::with_timeout(Duration::from_millis(50)).unwrap();
            let start = Instant::now();

            let err = scope
                .run(async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                })
                .unwrap_err();

            assert!(err.is_timeout());
            assert!(start.elapsed() < Duration::from_secs(1));
        })
        .await
        .unwrap();
    }
}
