//! Logger setup for binaries built on miniwidg

use crate::config::LoggingConfig;
use crate::constants::app;
use crate::utils::{PanelError, Result};
use chrono::Local;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use std::path::PathBuf;

/// Start the global logger. Keep the returned handle alive for the lifetime
/// of the program, file output stops when it is dropped.
pub fn initialize_logging(config: &LoggingConfig, title: &str) -> Result<LoggerHandle> {
    let logger = Logger::try_with_str(&config.level)
        .map_err(|e| PanelError::config(format!("Failed to create logger: {}", e)))?
        .format(flexi_logger::colored_opt_format);

    let logger = if config.log_to_file {
        logger
            .log_to_file(
                FileSpec::default()
                    .directory(log_directory(config))
                    .basename(log_basename(title))
                    .suffix("log"),
            )
            .duplicate_to_stdout(Duplicate::Debug)
            .rotate(
                Criterion::Size(config.max_file_size),
                Naming::Numbers,
                Cleanup::KeepLogFiles(config.max_files),
            )
    } else {
        logger.log_to_stdout()
    };

    logger
        .start()
        .map_err(|e| PanelError::config(format!("Failed to start logger: {}", e)))
}

fn log_directory(config: &LoggingConfig) -> PathBuf {
    config
        .log_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(app::NAME))
}

/// `miniwidg_<title>_<timestamp>` with characters unfit for file names replaced
fn log_basename(title: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d_%H_%M_%S").to_string();
    let title: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if title.is_empty() {
        format!("{}_{}", app::NAME, timestamp)
    } else {
        format!("{}_{}_{}", app::NAME, title, timestamp)
    }
}
