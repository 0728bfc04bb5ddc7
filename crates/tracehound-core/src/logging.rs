//! Logging configuration using tracing
//!
//! Diagnostics go to a daily-rotated file under the platform data-local
//! dir, never to the terminal: `analyze` prints its report path on stdout
//! and `watch` owns the artifact file, so stderr noise would only get in
//! the way of shell pipelines.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Fallback directive set when `THOUND_LOG` is unset or unparsable:
/// our crates at info, noisy HTTP internals at warn.
const DEFAULT_DIRECTIVES: &str = "tracehound=info,tracehound_core=info,tracehound_collab=info,hyper=warn,reqwest=warn";

/// Initialize the logging subsystem.
///
/// Log level is controlled by the `THOUND_LOG` environment variable:
///
/// ```bash
/// THOUND_LOG=debug thound analyze app.log
/// THOUND_LOG=tracehound_core=trace thound watch http://host/log
/// ```
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_layer = fmt::layer()
        .with_writer(RollingFileAppender::new(
            Rotation::DAILY,
            &log_dir,
            "thound.log",
        ))
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::ChronoLocal::new("%Y-%m-%dT%H:%M:%S%.3f".into()));

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .init();

    tracing::info!("tracehound starting, log directory {}", log_dir.display());
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("THOUND_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Where the rotated log files live
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tracehound")
        .join("logs")
}
