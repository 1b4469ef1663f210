use tracing_subscriber::{EnvFilter, fmt};

/// Installs the process-wide `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `default_directive`
/// (e.g. `"info"`). Output goes to stderr so stdout stays free for program
/// output. Calling this more than once is harmless.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
