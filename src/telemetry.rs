//! Tracing setup for the CLI.
//!
//! Spans and events go to stderr so command output on stdout stays clean
//! and pipeable. Verbosity is controlled through `RUST_LOG`.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Initialize the tracing subscriber for the process.
pub fn init_tracing_subscriber() {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(console_layer).init();
}
