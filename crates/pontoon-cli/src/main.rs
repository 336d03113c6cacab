//! Pontoon CLI - exercise the execution bridge from a blocking host.
//!
//! The binary itself is deliberately synchronous: `main` never enters a
//! runtime, which is exactly the situation the bridge exists for. Only the
//! `scoped --attach` command builds a host runtime, to demonstrate the
//! borrowed scope state.

mod probe;
mod scoped;
mod stress;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pontoon")]
#[command(about = "Run async operations from a blocking host with bounded waits")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one operation through the full wrapper chain
    Probe {
        /// How long the operation runs before resolving (ms)
        #[arg(long, default_value = "100")]
        delay_ms: u64,

        /// Time budget for the operation (ms)
        #[arg(long, default_value = "30000")]
        timeout_ms: u64,

        /// Make the operation fail with an application error
        #[arg(long)]
        fail: bool,

        /// Make the operation panic mid-flight
        #[arg(long)]
        panic: bool,
    },

    /// Issue many concurrent bridge calls and summarize the outcomes
    Stress {
        /// Number of concurrent calls
        #[arg(long, default_value = "8")]
        tasks: usize,

        /// How long each operation runs (ms)
        #[arg(long, default_value = "50")]
        delay_ms: u64,

        /// Time budget per call (ms)
        #[arg(long, default_value = "1000")]
        timeout_ms: u64,
    },

    /// Run a session of operations through one bridge scope
    Scoped {
        /// Number of operations to run in the scope
        #[arg(long, default_value = "3")]
        runs: usize,

        /// How long each operation runs (ms)
        #[arg(long, default_value = "20")]
        delay_ms: u64,

        /// Time budget per run (ms)
        #[arg(long, default_value = "1000")]
        timeout_ms: u64,

        /// Attach to a host runtime instead of owning one
        #[arg(long)]
        attach: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Probe {
            delay_ms,
            timeout_ms,
            fail,
            panic,
        } => {
            probe::execute(delay_ms, timeout_ms, fail, panic)?;
        }

        Commands::Stress {
            tasks,
            delay_ms,
            timeout_ms,
        } => {
            stress::execute(tasks, delay_ms, timeout_ms)?;
        }

        Commands::Scoped {
            runs,
            delay_ms,
            timeout_ms,
            attach,
        } => {
            scoped::execute(runs, delay_ms, timeout_ms, attach)?;
        }
    }

    Ok(())
}
