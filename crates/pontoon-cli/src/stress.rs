//! Stress command: concurrent bridge calls from independent threads.

use std::thread;
use std::time::{Duration, Instant};

use pontoon_console::style;
use pontoon_core::{BridgeError, call_timeout};

/// Fan out `tasks` bridge calls and summarize their outcomes.
pub fn execute(tasks: usize, delay_ms: u64, timeout_ms: u64) -> anyhow::Result<()> {
    let timeout = Duration::from_millis(timeout_ms);
    let delay = Duration::from_millis(delay_ms);
    let start = Instant::now();

    let handles: Vec<_> = (0..tasks)
        .map(|i| {
            thread::spawn(move || {
                call_timeout(
                    async move {
                        tokio::time::sleep(delay).await;
                        i
                    },
                    timeout,
                )
            })
        })
        .collect();

    let mut completed = 0usize;
    let mut timed_out = 0usize;
    let mut failed = 0usize;

    for (i, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(value)) => {
                tracing::debug!("Call {} returned {}", i, value);
                completed += 1;
            }
            Ok(Err(BridgeError::TimedOut(_))) => timed_out += 1,
            Ok(Err(e)) => {
                tracing::error!("Call {} failed: {}", i, e);
                failed += 1;
            }
            Err(_) => failed += 1,
        }
    }

    println!(
        "\n{}Completed{} {}/{} calls in {:.2}s",
        style::GREEN,
        style::RESET,
        completed,
        tasks,
        start.elapsed().as_secs_f64()
    );
    if timed_out > 0 {
        println!(
            "{}Timed out{} {}/{} calls (budget {:?})",
            style::YELLOW,
            style::RESET,
            timed_out,
            tasks,
            timeout
        );
    }
    if failed > 0 {
        println!(
            "{}Failed{} {}/{} calls",
            style::RED,
            style::RESET,
            failed,
            tasks
        );
    }

    Ok(())
}
