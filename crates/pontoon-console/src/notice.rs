//! Terminal notice output implementing `NoticeSink`.

use std::time::Duration;

use pontoon_core::NoticeSink;

use crate::style;

/// Notice sink printing colored one-line notices to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermNotices;

impl TermNotices {
    /// Create a terminal notice sink.
    pub fn new() -> Self {
        Self
    }
}

impl NoticeSink for TermNotices {
    fn timeout(&self, operation: &str, budget: Duration) {
        eprintln!(
            "{}⚠ Timed out:{} {} did not finish within {:?}",
            style::YELLOW,
            style::RESET,
            operation,
            budget
        );
    }

    fn failure(&self, operation: &str) {
        eprintln!(
            "{}✗ Failed:{} {} could not be completed",
            style::RED,
            style::RESET,
            operation
        );
    }
}
