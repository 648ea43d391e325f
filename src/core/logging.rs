//! Logging initialization
//!
//! Terminal logging is always on; a file logger is added when
//! `LOG_FILE_PATH` is set.

use anyhow::Result;
use simplelog::*;
use std::fs::File;

/// Maps the CLI verbosity count to a level filter.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize logger for console and optional file output
///
/// # Arguments
/// * `level` - Terminal log level
/// * `log_file_path` - Optional path to a log file (always logged at Info or finer)
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already installed
pub fn init_logger(level: LevelFilter, log_file_path: Option<&str>) -> Result<()> {
    let config = ConfigBuilder::new()
        .add_filter_allow_str("downloadex")
        .add_filter_allow_str("dex")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file_path {
        let log_file = File::create(path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;
        loggers.push(WriteLogger::new(level.max(LevelFilter::Info), config, log_file));
    }

    CombinedLogger::init(loggers).map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9), LevelFilter::Trace);
    }

    #[test]
    fn test_init_logger_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dex.log");
        assert!(!path.exists());

        // Installing the global logger may fail if another test got there
        // first; the file is created before that step either way.
        let _ = init_logger(LevelFilter::Info, Some(path.to_str().unwrap()));
        assert!(path.exists());
    }

    #[test]
    fn test_init_logger_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dex.log");
        let err = init_logger(LevelFilter::Info, Some(path.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().contains("Failed to create log file"));
    }
}
