//! Tracing subscriber setup for the `cropplan` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default `info` filter, e.g.
/// `RUST_LOG=cropplan=debug cropplan optimize ...`.
/// Output goes to stderr so stdout stays clean for reports.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
