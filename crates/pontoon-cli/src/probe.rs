//! Probe command: one operation through the full wrapper chain.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pontoon_console::{TermNotices, TermSpinner, style};
use pontoon_core::{Adapter, BridgeConfig};

/// Application-level failure injected by `--fail`.
#[derive(Debug)]
struct ProbeFailure;

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "simulated probe failure")
    }
}

/// Run one probe operation and report what came back.
///
/// The wrapped operation never raises into this host loop: failures show up
/// as notices on stderr and the probe reports that no value was produced.
pub fn execute(delay_ms: u64, timeout_ms: u64, fail: bool, panic: bool) -> anyhow::Result<()> {
    let adapter = Adapter::new()
        .with_progress(Arc::new(TermSpinner::new()))
        .with_notices(Arc::new(TermNotices::new()))
        .with_config(BridgeConfig::with_timeout(Duration::from_millis(timeout_ms)));

    let delay = Duration::from_millis(delay_ms);
    let probe = adapter.wrap("probe", "Probing", move || async move {
        tokio::time::sleep(delay).await;
        if panic {
            panic!("simulated probe panic");
        }
        if fail {
            return Err(ProbeFailure);
        }
        Ok(delay.as_millis() as u64)
    });

    let start = Instant::now();
    match probe() {
        Some(value) => {
            println!(
                "{}✓ Probe finished{} in {:.2}s (value {})",
                style::GREEN,
                style::RESET,
                start.elapsed().as_secs_f64(),
                value
            );
        }
        None => {
            println!(
                "{}No value produced{} after {:.2}s",
                style::DIM,
                style::RESET,
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}
