//! Structured logging initialization.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber for the engine.
///
/// Honors `RUST_LOG` if set; otherwise falls back to `info` for the engine's
/// own crates and `warn` for dependencies, or `debug`/`info` when `verbose`
/// is requested.
///
/// # Errors
///
/// Returns an error if a subscriber has already been installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        if verbose {
            EnvFilter::try_new("clearance=debug,info")
        } else {
            EnvFilter::try_new("clearance=info,warn")
        }
    })?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
