//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout stays clean for command output that is piped
//! (exported JSON, graphs). `RUST_LOG` wins over `--log-level`.

use tracing_subscriber::EnvFilter;

pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("forestal={level},forestal_core={level},tower_http=warn")));

    // A second init (tests calling into the library) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
