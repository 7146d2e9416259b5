#![forbid(unsafe_code)]

//! `cardgrid-replay`: replay gesture traces and print the outcome.
//!
//! # Running
//!
//! ```sh
//! cargo run -p cardgrid-harness --bin cardgrid-replay -- trace.jsonl [more.jsonl ...]
//! ```
//!
//! Each trace's outcome is printed as one JSON object per line. Set
//! `CARDGRID_LOG` (e.g. `CARDGRID_LOG=cardgrid_core=debug`) for transition
//! logs on stderr. Exits non-zero if any trace fails.

use std::io::{self, Write};
use std::process::ExitCode;

use cardgrid_harness::replay_trace;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "CARDGRID_LOG";

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: cardgrid-replay <trace.jsonl>...");
        return ExitCode::from(2);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;
    for path in &paths {
        match replay_trace(path) {
            Ok(outcome) => {
                let written = serde_json::to_writer(&mut out, &outcome)
                    .map_err(io::Error::other)
                    .and_then(|()| out.write_all(b"\n"));
                if let Err(err) = written {
                    tracing::error!(path = %path, error = %err, "failed to write outcome");
                    return ExitCode::FAILURE;
                }
            }
            Err(err) => {
                tracing::error!(path = %path, error = %err, "replay failed");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
