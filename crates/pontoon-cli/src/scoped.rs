//! Scoped command: a session of operations through one bridge scope.

use std::time::{Duration, Instant};

use pontoon_console::style;
use pontoon_core::BridgeScope;

/// Run a scope session, optionally from inside a host runtime.
///
/// With `--attach` the session runs in a `spawn_blocking` section of a
/// multi-thread host runtime, which is where a synchronous caller inside an
/// async application actually lives. The scope then borrows that runtime
/// instead of building its own.
pub fn execute(runs: usize, delay_ms: u64, timeout_ms: u64, attach: bool) -> anyhow::Result<()> {
    if attach {
        let host = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        host.block_on(async move {
            tokio::task::spawn_blocking(move || session(runs, delay_ms, timeout_ms))
                .await
                .map_err(|e| anyhow::anyhow!("Host task failed: {}", e))?
        })
    } else {
        session(runs, delay_ms, timeout_ms)
    }
}

/// Run `runs` operations through one scope and print each value.
fn session(runs: usize, delay_ms: u64, timeout_ms: u64) -> anyhow::Result<()> {
    let scope = BridgeScope::with_timeout(Duration::from_millis(timeout_ms))?;
    let state = if scope.is_borrowed() {
        "borrowed"
    } else {
        "owned"
    };
    println!("{}Scope:{} {}", style::BOLD, style::RESET, state);

    let delay = Duration::from_millis(delay_ms);
    let start = Instant::now();

    for i in 0..runs {
        let value = scope.run(async move {
            tokio::time::sleep(delay).await;
            i + 1
        })?;
        println!(
            "{}  ✓ run {}{} -> {}",
            style::GREEN,
            i + 1,
            style::RESET,
            value
        );
    }

    println!(
        "\n{}Completed{} {} runs in {:.2}s",
        style::GREEN,
        style::RESET,
        runs,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
