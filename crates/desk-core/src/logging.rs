use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{CallDeskError, Result};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use
    pub level: Level,
    /// Whether to enable JSON formatting
    pub json: bool,
    /// Whether to include file and line information
    pub file_info: bool,
    /// Application name to include in the startup line
    pub app_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: Level::WARN,
            json: false,
            file_info: false,
            app_name: "calldesk".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn new(level: Level, app_name: impl Into<String>) -> Self {
        LoggingConfig {
            level,
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }

    /// Map a `-v` count onto a level: 0 warn, 1 info, 2 debug, 3+ trace
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        self
    }
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable. `RUST_LOG` directives take precedence.
pub fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.level).into())
        .from_env_lossy();

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(config.file_info)
        .with_line_number(config.file_info);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CallDeskError::config(format!("Failed to install logger: {}", e)))?;

    tracing::debug!("Starting {} v{}", config.app_name, env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level).map_err(|_| CallDeskError::config(format!("Invalid log level: {}", level)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.clone().with_verbosity(1).level, Level::INFO);
        assert_eq!(config.clone().with_verbosity(2).level, Level::DEBUG);
        assert_eq!(config.with_verbosity(7).level, Level::TRACE);
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
        assert!(matches!(parse_log_level("loud"), Err(CallDeskError::Config(_))));
    }
}
