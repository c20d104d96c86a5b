//! Tracing subscriber setup for the binary.

use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const FILE_FILTER: &str = "plantbook=info";

/// Installs the global subscriber.
///
/// Stderr follows `RUST_LOG`, falling back to warnings only (debug with
/// `verbose`) so log lines don't interleave with REPL output. With a log
/// directory, `plantbook=info` also goes to a daily-rotated file. Keep the
/// returned guard alive until exit or buffered lines are lost.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let stderr_default = if verbose {
        "plantbook=debug"
    } else {
        "plantbook=warn"
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter_or(stderr_default));

    let (file_layer, guard) = match log_dir.and_then(open_log_dir) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "plantbook.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter_or(FILE_FILTER));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}

fn env_filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn open_log_dir(dir: &Path) -> Option<&Path> {
    match std::fs::create_dir_all(dir) {
        Ok(()) => Some(dir),
        Err(e) => {
            eprintln!("Logging to file disabled ({}): {}", dir.display(), e);
            None
        }
    }
}
