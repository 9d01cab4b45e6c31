//! Per-session file logging.
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Setup logging to `<log_dir>/<session>/battle.log`.
///
/// Stdout belongs to the game, so nothing is logged to the terminal. The
/// returned guard flushes the file writer when dropped.
pub fn setup_logging(session_id: Option<&str>, log_dir: Option<&Path>) -> Result<WorkerGuard> {
    let session_id = session_id.map_or_else(default_session_id, str::to_owned);
    let log_dir = log_dir.map_or_else(default_log_directory, Path::to_path_buf);

    let session_log_dir = log_dir.join(&session_id);
    std::fs::create_dir_all(&session_log_dir)
        .with_context(|| format!("failed to create log directory {}", session_log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "battle.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/battle.log", session_log_dir.display());

    Ok(guard)
}

fn default_session_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{timestamp}")
}

/// Platform cache directory, e.g. `~/.cache/battle/logs`.
fn default_log_directory() -> PathBuf {
    let cache = if cfg!(target_os = "macos") {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join("Library").join("Caches"))
    } else if cfg!(target_os = "windows") {
        std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
    } else {
        std::env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
    };

    cache
        .unwrap_or_else(std::env::temp_dir)
        .join("battle")
        .join("logs")
}
