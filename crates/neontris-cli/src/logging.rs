use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "neontris=info";
const DEFAULT_LOG_FILE: &str = "neontris.log";

/// Where log lines go.
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Append to a file. The TUI owns the terminal, so interactive play always logs here.
    File(PathBuf),
    Stderr,
}

impl LogTarget {
    /// `neontris.log` under the system temp directory.
    pub fn default_file() -> Self {
        LogTarget::File(std::env::temp_dir().join("neontris").join(DEFAULT_LOG_FILE))
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the default `neontris=info` filter. The returned guard flushes
/// buffered lines when dropped and must be kept alive for the whole run.
pub fn init(target: &LogTarget) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (writer, guard) = match target {
        LogTarget::File(path) => {
            let (dir, file_name) = split_log_path(path)?;
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
        LogTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install the log subscriber")?;

    if let LogTarget::File(path) = target {
        tracing::info!(log = %path.display(), "logging initialized");
    }
    Ok(guard)
}

fn split_log_path(path: &Path) -> anyhow::Result<(&Path, &Path)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir, Path::new(file_name)))
}
