//! Tracing setup for the whole application.
//!
//! Structured logging via the `tracing` crate; the log level comes from the
//! `RUST_LOG` environment variable (`RUST_LOG=info cargo run` for the usual
//! output, `RUST_LOG=debug` to see per-item mutations).

/// Initializes the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Keep lines short; records carry their own fields.
        .compact()
        .init();
}
