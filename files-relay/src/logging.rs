//! Tracing setup: stderr plus, when a log directory is configured, a full log
//! file and an errors-only log file.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE: &str = "files-relay.log";
pub const ERROR_LOG_FILE: &str = "files-relay-errors.log";

/// Install the global subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init(directory: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (all_log, error_log) = match directory {
        Some(dir) => {
            let (all, errors) = open_log_files(dir)?;
            (Some(all), Some(errors))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(all_log.map(|file| fmt::layer().with_ansi(false).with_writer(Mutex::new(file))))
        .with(error_log.map(|file| {
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::ERROR)
        }))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(log_dir = ?directory, "tracing initialised");
    Ok(())
}

/// Create `dir` if needed and open both log files for appending.
pub fn open_log_files(dir: &Path) -> Result<(File, File)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let all = open_append(dir.join(LOG_FILE))?;
    let errors = open_append(dir.join(ERROR_LOG_FILE))?;
    Ok((all, errors))
}

fn open_append(path: PathBuf) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_nested_log_directory_and_both_files() {
        let root = tempdir().unwrap();
        let dir = root.path().join("logs").join("nested");

        open_log_files(&dir).expect("log files should open");

        assert!(dir.join(LOG_FILE).is_file());
        assert!(dir.join(ERROR_LOG_FILE).is_file());
    }

    #[test]
    fn reopening_appends_instead_of_truncating() {
        use std::io::Write;

        let root = tempdir().unwrap();
        {
            let (mut all, _) = open_log_files(root.path()).unwrap();
            writeln!(all, "first run").unwrap();
        }
        {
            let (mut all, _) = open_log_files(root.path()).unwrap();
            writeln!(all, "second run").unwrap();
        }

        let text = fs::read_to_string(root.path().join(LOG_FILE)).unwrap();
        assert_eq!(text, "first run\nsecond run\n");
    }
}
