//! Tracing setup.
//!
//! Stdout carries the analysis JSON, so every log line goes to stderr.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default directives layered on top of `RUST_LOG`.
const DEFAULT_DIRECTIVES: &[&str] = &["swing=info", "ort=warn", "onnxruntime=warn"];

/// Whether `LOG_FORMAT` asks for JSON lines.
pub fn use_json_format(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
}

fn env_filter() -> EnvFilter {
    DEFAULT_DIRECTIVES
        .iter()
        .filter_map(|d| d.parse().ok())
        .fold(EnvFilter::from_default_env(), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Install the global subscriber. Colored output for dev, JSON for production.
pub fn init_tracing() {
    let format = std::env::var("LOG_FORMAT").ok();

    if use_json_format(format.as_deref()) {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter())
            .init();
    }
}
