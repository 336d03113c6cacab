//! Wrapper chain turning async operations into plain synchronous calls.
//!
//! Three layers compose here, innermost first: `bridged` routes a future
//! through the bridge, `with_spinner` keeps a progress indicator active for
//! the duration, and `Adapter::wrap` adds notice translation on top. The
//! adapter is the only place failures are swallowed; everything below it
//! propagates errors to the caller.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use crate::bridge::{self, BridgeConfig};
use crate::error::{BridgeError, Result};
use crate::notify::{NoticeSink, NullNotices, NullProgress, ProgressIndicator};

/// Turn an async operation into a blocking closure.
///
/// `f` builds a fresh future per invocation, so the returned closure can be
/// called repeatedly. Failures propagate as errors; see [`Adapter::wrap`] for
/// the swallowing variant.
pub fn bridged<F, Fut>(f: F, config: BridgeConfig) -> impl Fn() -> Result<Fut::Output>
where
    F: Fn() -> Fut,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    move || bridge::call_with(f(), &config)
}

/// Run `f` with a progress indicator active for its duration.
///
/// The indicator is finished on every exit path, including a panic in `f`.
pub fn with_spinner<T>(
    progress: &dyn ProgressIndicator,
    message: &str,
    f: impl FnOnce() -> T,
) -> T {
    let _guard = ProgressGuard::start(progress, message);
    f()
}

/// Pairs `on_start` with `on_finish` by scope.
struct ProgressGuard<'a> {
    progress: &'a dyn ProgressIndicator,
}

impl<'a> ProgressGuard<'a> {
    fn start(progress: &'a dyn ProgressIndicator, message: &str) -> Self {
        progress.on_start(message);
        Self { progress }
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.progress.on_finish();
    }
}

/// Composes bridging, progress display, and notice translation.
///
/// Closures produced by [`Adapter::wrap`] never fail from the caller's point
/// of view: a timeout becomes a timeout notice, any other failure is logged
/// and becomes a generic notice, and the closure yields `None`. This is a
/// display-boundary policy so one failing operation cannot take down a
/// blocking host loop.
pub struct Adapter {
    progress: Arc<dyn ProgressIndicator>,
    notices: Arc<dyn NoticeSink>,
    config: BridgeConfig,
}

impl Adapter {
    /// Adapter with no display attached and default timing.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NullProgress),
            notices: Arc::new(NullNotices),
            config: BridgeConfig::default(),
        }
    }

    /// Attach a progress indicator.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressIndicator>) -> Self {
        self.progress = progress;
        self
    }

    /// Attach a notice sink.
    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    /// Override the bridge tuning.
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Wrap an async operation into a blocking closure that cannot fail.
    ///
    /// `operation` names the operation in logs and notices; `message` is what
    /// the progress indicator shows while it runs. The operation's own `Err`
    /// output and every bridge failure are swallowed into `None` after being
    /// reported; on success the closure yields `Some(value)`.
    pub fn wrap<F, Fut, T, E>(
        &self,
        operation: impl Into<String>,
        message: impl Into<String>,
        f: F,
    ) -> impl Fn() -> Option<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let operation = operation.into();
        let message = message.into();
        let progress = Arc::clone(&self.progress);
        let notices = Arc::clone(&self.notices);
        let config = self.config.clone();

        move || {
            let outcome = with_spinner(progress.as_ref(), &message, || {
                bridge::call_with(f(), &config)
            });
            match outcome {
                Ok(Ok(value)) => Some(value),
                Ok(Err(e)) => {
                    tracing::error!("Operation {} failed: {}", operation, e);
                    notices.failure(&operation);
                    None
                }
                Err(BridgeError::TimedOut(budget)) => {
                    notices.timeout(&operation, budget);
                    None
                }
                Err(e) => {
                    tracing::error!("Operation {} failed: {}", operation, e);
                    notices.failure(&operation);
                    None
                }
            }
        }
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new()
    }
}
