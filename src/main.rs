//! Account Consolidator CLI
//!
//! Command-line interface for consolidating account movements from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- movements.csv > summaries.csv
//! cargo run -- --strategy continuation movements.csv > summaries.csv
//! cargo run -- --strategy await --worker-threads 4 --delay-ms 50 movements.csv > summaries.csv
//! cargo run -- --timeout-ms 2000 movements.csv > summaries.csv
//! ```
//!
//! The program reads movements from the input CSV file, consolidates every
//! account concurrently using the selected completion style, and writes one
//! summary row per account to stdout. Logs go to stderr; set `RUST_LOG` to
//! change the level.
//!
//! # Completion Styles
//!
//! - **continuation**: the run registers a callback that presents the outcome
//! - **await**: an owner-side task awaits the run, then presents it (default)
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, failed account, timeout, etc.)

use account_consolidator::cli;
use account_consolidator::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    let strategy = strategy::create_strategy(args.strategy.clone(), Some(args.to_engine_config()));

    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
