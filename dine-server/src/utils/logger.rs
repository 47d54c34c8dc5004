//! Logging Infrastructure
//!
//! `tracing-subscriber` with an `EnvFilter`, optional JSON lines and an
//! optional daily rolling file under `LOG_DIR`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "dine_server=info,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the logger on stdout
pub fn init_logger(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Initialize the logger, writing to a daily rolling file when `log_dir` is set
///
/// The returned guard flushes the non-blocking writer on drop and must be held
/// for the lifetime of the process.
pub fn init_logger_with_file(json: bool, log_dir: Option<&str>) -> std::io::Result<Option<WorkerGuard>> {
    let Some(dir) = log_dir else {
        init_logger(json);
        return Ok(None);
    };

    let log_path = Path::new(dir);
    if !log_path.exists() {
        std::fs::create_dir_all(log_path)?;
    }

    let file_appender = tracing_appender::rolling::daily(log_path, "dine-server");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(Some(guard))
}
