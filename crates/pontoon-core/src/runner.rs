//! Isolated execution of one future on a dedicated worker thread.
//!
//! Each worker owns a current-thread Tokio runtime that lives exactly as long
//! as the invocation. The future runs under an internal time budget; when the
//! budget expires the future is dropped, which cancels it at its next await
//! point.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use futures::future::FutureExt;

use crate::error::Result;
use crate::handoff::{self, HandoffReceiver, Outcome};

/// Monotonic counter feeding worker thread names.
static WORKER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Handle to a spawned worker thread.
pub(crate) struct WorkerHandle<T> {
    /// Join handle for the worker thread.
    pub(crate) thread: thread::JoinHandle<()>,
    /// Receiver for the single outcome the worker delivers.
    pub(crate) outcome: HandoffReceiver<T>,
    /// Thread name, kept for log messages.
    pub(crate) name: String,
}

/// Spawn a worker thread that drives `future` under `budget` on a fresh
/// current-thread runtime.
///
/// The worker delivers exactly one outcome through its handoff, and its
/// runtime is closed before the outcome is handed over, on every path.
pub(crate) fn spawn_worker<F>(future: F, budget: Duration) -> Result<WorkerHandle<F::Output>>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let name = format!(
        "pontoon-worker-{}",
        WORKER_SEQ.fetch_add(1, Ordering::Relaxed)
    );
    let (sender, receiver) = handoff::channel();

    let thread = thread::Builder::new().name(name.clone()).spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                sender.deliver(Outcome::Runtime(e.to_string()));
                return;
            }
        };

        let outcome = runtime.block_on(drive(future, budget));

        // Loop fully closed before the outcome crosses the handoff, so a
        // delivered outcome implies the worker is already past teardown.
        drop(runtime);
        sender.deliver(outcome);
    })?;

    tracing::trace!("Spawned {}", name);
    Ok(WorkerHandle {
        thread,
        outcome: receiver,
        name,
    })
}

/// Drive `future` under `budget` with panic capture.
///
/// Shared by worker threads and owned scopes so both paths time out and
/// report panics identically. Expiry drops the future, cancelling it at its
/// next suspension point.
pub(crate) async fn drive<F>(future: F, budget: Duration) -> Outcome<F::Output>
where
    F: Future,
{
    let guarded = AssertUnwindSafe(future).catch_unwind();
    match tokio::time::timeout(budget, guarded).await {
        Ok(Ok(value)) => Outcome::Completed(value),
        Ok(Err(payload)) => Outcome::Panicked(panic_message(payload.as_ref())),
        Err(_) => Outcome::TimedOut(budget),
    }
}

/// Render a panic payload as a message.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::Wait;
    use std::any::Any;

    #[test]
    fn test_worker_delivers_value() {
        let worker = spawn_worker(async { 41 + 1 }, Duration::from_secs(1)).unwrap();

        match worker.outcome.wait(Duration::from_secs(2)) {
            Wait::Delivered(Outcome::Completed(42)) => {}
            _ => panic!("expected completed outcome"),
        }
        worker.thread.join().unwrap();
    }

    #[test]
    fn test_worker_reports_panic() {
        let worker = spawn_worker(
            async {
                panic!("worker exploded");
            },
            Duration::from_secs(1),
        )
        .unwrap();

        match worker.outcome.wait(Duration::from_secs(2)) {
            Wait::Delivered(Outcome::Panicked(message)) => {
                assert_eq!(message, "worker exploded");
            }
            _ => panic!("expected panicked outcome"),
        }
        worker.thread.join().unwrap();
    }

    #[test]
    fn test_worker_budget_cancels_future() {
        let worker = spawn_worker(
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "never"
            },
            Duration::from_millis(50),
        )
        .unwrap();

        match worker.outcome.wait(Duration::from_secs(2)) {
            Wait::Delivered(Outcome::TimedOut(budget)) => {
                assert_eq!(budget, Duration::from_millis(50));
            }
            _ => panic!("expected timed-out outcome"),
        }
        worker.thread.join().unwrap();
    }

    #[test]
    fn test_worker_threads_are_named() {
        let worker = spawn_worker(async {}, Duration::from_secs(1)).unwrap();
        assert!(worker.name.starts_with("pontoon-worker-"));
        assert_eq!(worker.thread.thread().name(), Some(worker.name.as_str()));

        worker.outcome.wait(Duration::from_secs(2));
        worker.thread.join().unwrap();
    }

    #[tokio::test]
    async fn test_drive_completes() {
        match drive(async { "done" }, Duration::from_secs(1)).await {
            Outcome::Completed("done") => {}
            _ => panic!("expected completed outcome"),
        }
    }

    #[tokio::test]
    async fn test_drive_times_out() {
        let outcome = drive(
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
            },
            Duration::from_millis(20),
        )
        .await;
        assert!(matches!(outcome, Outcome::TimedOut(_)));
    }

    #[test]
    fn test_panic_message_downcasts() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new("owned message".to_string());
        assert_eq!(panic_message(payload.as_ref()), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
