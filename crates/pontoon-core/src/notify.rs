//! Callback seams for progress display and user-facing notices.
//!
//! The bridge never prints anything itself. Display concerns are injected
//! through these traits; terminal implementations live in `pontoon-console`.

use std::time::Duration;

/// Callback trait for progress display around a bridged operation.
///
/// Implementations must tolerate nested start/finish pairs, since wrapped
/// operations may call other wrapped operations.
pub trait ProgressIndicator: Send + Sync {
    /// Called when the operation starts.
    fn on_start(&self, message: &str);

    /// Called when the operation finishes, successfully or not.
    fn on_finish(&self);
}

/// Callback trait for user-facing notices about failed operations.
pub trait NoticeSink: Send + Sync {
    /// Called when an operation exceeds its time budget.
    fn timeout(&self, operation: &str, budget: Duration);

    /// Called when an operation fails for any other reason.
    fn failure(&self, operation: &str);
}

/// Progress indicator that displays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressIndicator for NullProgress {
    fn on_start(&self, _message: &str) {}
    fn on_finish(&self) {}
}

/// Notice sink that discards notices.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotices;

impl NoticeSink for NullNotices {
    fn timeout(&self, _operation: &str, _budget: Duration) {}
    fn failure(&self, _operation: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_implementations_accept_calls() {
        let progress = NullProgress;
        progress.on_start("working");
        progress.on_finish();

        let notices = NullNotices;
        notices.timeout("op", Duration::from_secs(1));
        notices.failure("op");
    }

    #[test]
    fn test_traits_are_object_safe() {
        let progress: Box<dyn ProgressIndicator> = Box::new(NullProgress);
        progress.on_start("working");
        progress.on_finish();

        let notices: Box<dyn NoticeSink> = Box::new(NullNotices);
        notices.failure("op");
    }
}
