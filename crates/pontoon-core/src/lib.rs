//! Bounded synchronous execution of async operations.
//!
//! This crate lets a blocking, single-threaded host run Tokio futures and
//! collect their results without joining a runtime:
//! - Blocking calls on an isolated per-call runtime (`call`, `call_timeout`,
//!   `call_with`)
//! - Wrapper chains adding progress display and notice translation
//!   (`bridged`, `with_spinner`, `Adapter`)
//! - Scoped bridging that adapts to an already-running runtime
//!   (`BridgeScope`)
//!
//! The caller is never blocked longer than the configured timeout plus a
//! teardown grace, and a failing operation surfaces as a [`BridgeError`]
//! rather than tearing down the host.

pub mod adapter;
pub mod bridge;
pub mod error;
mod handoff;
pub mod notify;
mod runner;
pub mod scope;

pub use adapter::{Adapter, bridged, with_spinner};
pub use bridge::{BridgeConfig, DEFAULT_TIMEOUT, JOIN_GRACE, call, call_timeout, call_with};
pub use error::{BridgeError, Result};
pub use notify::{NoticeSink, NullNotices, NullProgress, ProgressIndicator};
pub use scope::BridgeScope;
