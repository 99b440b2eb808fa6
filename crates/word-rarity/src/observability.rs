//! Logging setup.
//!
//! Human-readable events go to stderr (stdout belongs to command output and
//! the MCP transport). When a log location is known, every event is also
//! written as JSON lines to a file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Env var naming an exact log file.
const LOG_PATH_ENV: &str = "WORD_RARITY_LOG_PATH";
/// Env var naming a log directory.
const LOG_DIR_ENV: &str = "WORD_RARITY_LOG_DIR";
/// File name used inside a log directory.
const LOG_FILE_NAME: &str = "word-rarity.jsonl";

/// Where (if anywhere) JSON logs are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Target file for JSONL logs; `None` disables file logging.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, then the configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    /// Precedence: explicit file path, env directory, configured directory.
    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let log_file = env_path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| {
                env_dir
                    .filter(|d| !d.as_os_str().is_empty())
                    .or(config_dir)
                    .map(|dir| dir.join(LOG_FILE_NAME))
            });
        Self { log_file }
    }
}

/// Build the event filter.
///
/// `-q` and `-v` win over everything; otherwise `RUST_LOG`, then the
/// configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    let forced = if quiet {
        Some("error")
    } else {
        match verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    };

    match forced {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it until exit.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match config.log_file {
        Some(ref path) => {
            let (dir, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

fn split_log_path(path: &Path) -> anyhow::Result<(&Path, &std::ffi::OsStr)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir, file_name))
}
