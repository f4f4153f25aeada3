//! Tracing configuration for insert-guard
//!
//! Structured logging for the bootstrap and the `insert-probe` binary.
//! Library crates only emit events; this is the single place that installs
//! a subscriber.

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Build the default filter directives for tracing
///
/// `verbose` raises the insert-guard crates to debug; everything else stays
/// at warn so diesel/r2d2 noise does not drown the probe output.
fn build_filter_directives(verbose: bool) -> Vec<String> {
    let level = if verbose { "debug" } else { "info" };
    vec![
        "warn".to_string(),
        format!("insert_guard_lib={level}"),
        format!("insert_probe={level}"),
        format!("ig_app={level}"),
        format!("ig_infra={level}"),
    ]
}

/// Initialize the tracing subscriber
///
/// ## Behavior / 行为
///
/// - **Environment filter**: respects `RUST_LOG`, falls back to the
///   directives above / 优先使用 `RUST_LOG`
/// - **Output**: stderr, so probe results on stdout stay machine readable
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber(verbose: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(build_filter_directives(verbose).join(",")));

    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(std::io::stderr);

    registry().with(env_filter).with(stderr_layer).try_init()?;

    Ok(())
}
