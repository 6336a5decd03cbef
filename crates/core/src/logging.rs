//! Logging initialization and configuration.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the logging system with tracing.
///
/// This sets up tracing-subscriber with:
/// - Environment-based filtering (RUST_LOG)
/// - Target and thread annotations on every line
///
/// Benchmark progress is reported at `info`, so the default filter keeps it
/// visible without any `RUST_LOG` configuration.
///
/// # Example
/// ```
/// tracer_core::init_logging();
/// tracing::info!("Ray tracer initialized");
/// ```
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tracer=debug,winit=warn"));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .try_init();

    // Doc tests and test harnesses may have installed one already
    if let Err(e) = result {
        tracing::debug!("Keeping the existing tracing subscriber: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
        tracing::info!("Logging initialized");
    }
}
