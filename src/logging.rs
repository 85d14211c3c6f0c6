use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,dadjokes=debug";
const LOG_FILE_PREFIX: &str = "dadjokes.log";

/// Install the global subscriber, writing to a file.
///
/// The terminal belongs to the UI, so nothing is logged to stdout or stderr.
/// Without an explicit file, logs roll daily under the data directory.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(log_file: Option<&Path>) -> Result<WorkerGuard> {
  let appender = match log_file {
    Some(path) => {
      let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
      let name = path
        .file_name()
        .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?;
      create_dir(dir)?;
      tracing_appender::rolling::never(dir, name)
    }
    None => {
      let dir = default_log_dir()?;
      create_dir(&dir)?;
      tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX)
    }
  };

  let (writer, guard) = tracing_appender::non_blocking(appender);

  let env_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

  let fmt_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_target(true)
    .with_writer(writer);

  tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt_layer)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}

fn default_log_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("dadjokes").join("logs"))
}

fn create_dir(dir: &Path) -> Result<()> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))
}
