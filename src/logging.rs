//! File-based logging.
//!
//! The terminal belongs to the TUI, so log output goes to a file only.
//! `SERENE_LOG` overrides the configured filter directive.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SERENE_LOG";

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber writing to `path`.
///
/// Fails if the file cannot be opened or a subscriber is already set; the
/// app keeps running without logs in that case.
pub fn init(path: &Path, default_directive: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter(default_directive))
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_creates_log_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("serene.log");
        // a subscriber may already be installed by another test in this process
        let _ = init(&path, "debug");
        assert!(path.exists());
    }
}
