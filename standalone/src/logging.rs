//! Logging infrastructure for the standalone library.
//!
//! Library code reports through the `log` facade. This module provides the
//! stderr backend the CLI installs, with three coarse verbosity levels.

use std::env;
use std::fmt;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Logging level for controlling output verbosity.
///
/// Log levels are ordered from least verbose (Quiet) to most verbose (Verbose).
///
/// # Examples
///
/// ```
/// use standalone::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Errors only.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// Everything, including info and debug messages.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level from a string.
    ///
    /// Recognizes: "quiet", "normal", "verbose" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use standalone::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("quiet").unwrap(), LogLevel::Quiet);
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("invalid").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    /// The `log` filter matching this level.
    #[must_use]
    pub const fn filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Error,
            Self::Normal => LevelFilter::Warn,
            Self::Verbose => LevelFilter::Debug,
        }
    }
}

/// A stderr logger for the `log` facade.
///
/// # Examples
///
/// ```
/// use log::Log;
/// use standalone::{LogLevel, Logger};
///
/// let logger = Logger::new(LogLevel::Normal);
/// assert!(logger.enabled(&log::Metadata::builder().level(log::Level::Warn).build()));
/// assert!(!logger.enabled(&log::Metadata::builder().level(log::Level::Info).build()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a new logger with the specified log level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the current log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Install this logger as the global `log` backend.
    ///
    /// Only the first call in a process takes effect; later calls leave the
    /// installed logger alone.
    pub fn install(self) {
        let filter = self.level.filter();
        if log::set_boxed_logger(Box::new(self)).is_ok() {
            log::set_max_level(filter);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level.filter()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug | Level::Trace => "DEBUG",
        };
        eprintln!("{tag}: {}", record.args());
    }

    fn flush(&self) {}
}

/// Resolves the log level from CLI flags and the environment, installs the
/// logger, and returns it.
///
/// The priority order is:
/// 1. CLI flags (verbose/quiet)
/// 2. `STANDALONE_LOG_MODE` environment variable
/// 3. Default (Normal)
///
/// If both `verbose` and `quiet` are true, `verbose` takes precedence.
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    let logger = resolve_logger(verbose, quiet);
    logger.install();
    logger
}

fn resolve_logger(verbose: bool, quiet: bool) -> Logger {
    if verbose {
        return Logger::new(LogLevel::Verbose);
    }
    if quiet {
        return Logger::new(LogLevel::Quiet);
    }

    if let Ok(env_value) = env::var("STANDALONE_LOG_MODE") {
        if let Ok(level) = LogLevel::parse(&env_value) {
            return Logger::new(level);
        }
    }

    Logger::new(LogLevel::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn enabled_at(logger: &Logger, level: Level) -> bool {
        logger.enabled(&Metadata::builder().level(level).build())
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(format!("{}", LogLevel::Quiet), "quiet");
        assert_eq!(format!("{}", LogLevel::Normal), "normal");
        assert_eq!(format!("{}", LogLevel::Verbose), "verbose");
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("Normal").unwrap(), LogLevel::Normal);
        assert!(LogLevel::parse("").is_err());
    }

    #[test]
    fn test_levels_filter_messages() {
        let quiet = Logger::new(LogLevel::Quiet);
        assert!(enabled_at(&quiet, Level::Error));
        assert!(!enabled_at(&quiet, Level::Warn));

        let normal = Logger::default();
        assert!(enabled_at(&normal, Level::Warn));
        assert!(!enabled_at(&normal, Level::Info));

        let verbose = Logger::new(LogLevel::Verbose);
        assert!(enabled_at(&verbose, Level::Debug));
        assert!(!enabled_at(&verbose, Level::Trace));
    }

    #[test]
    fn test_flags() {
        assert_eq!(resolve_logger(true, false).level(), LogLevel::Verbose);
        assert_eq!(resolve_logger(false, true).level(), LogLevel::Quiet);
        assert_eq!(resolve_logger(true, true).level(), LogLevel::Verbose);
    }

    #[test]
    #[serial]
    fn test_env_and_fallback() {
        let saved = env::var("STANDALONE_LOG_MODE").ok();

        env::set_var("STANDALONE_LOG_MODE", "verbose");
        assert_eq!(resolve_logger(false, false).level(), LogLevel::Verbose);

        env::set_var("STANDALONE_LOG_MODE", "invalid");
        assert_eq!(resolve_logger(false, false).level(), LogLevel::Normal);

        env::set_var("STANDALONE_LOG_MODE", "normal");
        assert_eq!(resolve_logger(true, false).level(), LogLevel::Verbose);

        match saved {
            Some(val) => env::set_var("STANDALONE_LOG_MODE", val),
            None => env::remove_var("STANDALONE_LOG_MODE"),
        }
    }
}
