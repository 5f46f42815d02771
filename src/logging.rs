//! Logging initialisation.
//!
//! Filter priority: RUST_LOG env var > `--debug` flag > default "info".
//! Output goes to stderr.

use crate::config::{APP_NAME, APP_VERSION, DEFAULT_LOG_LEVEL};
use tracing_subscriber::EnvFilter;

pub fn init(debug_flag: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .init();

    tracing::debug!(app = APP_NAME, version = APP_VERSION, "Logging initialised");
}
