use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the log subscriber.
///
/// The level filter comes from `RUST_LOG` (default: `info`). Request logs
/// from the actix `Logger` middleware are picked up through the `log`
/// bridge, so one subscriber covers both.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
