use std::io;

use anyhow::Result;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Log configuration options
pub struct LogConfig {
    /// Log level for console output
    pub console_level: LevelFilter,
    /// Log level for file output
    pub file_level: LevelFilter,
    /// Path to log file (None means no file logging)
    pub log_file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::Info,
            file_level: LevelFilter::Debug,
            log_file: None,
        }
    }
}

impl LogConfig {
    pub fn new(level: &str, log_file: Option<String>) -> Self {
        Self {
            console_level: parse_log_level(level),
            log_file,
            ..Self::default()
        }
    }
}

/// Install the global logger. Console lines are colored; the file sink is plain.
pub fn init(config: LogConfig) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .level(config.console_level)
        .chain(io::stdout());

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Trace)
        // HTTP internals are noisy at debug.
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(console);

    if let Some(log_file) = config.log_file {
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.target(),
                    record.level(),
                    message
                ))
            })
            .level(config.file_level)
            .chain(fern::log_file(log_file)?);
        dispatch = dispatch.chain(file);
    }

    dispatch.apply()?;
    Ok(())
}

/// Utility function to convert a string to a log level
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_log_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_log_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_log_config_from_flags() {
        let config = LogConfig::new("error", Some("run.log".to_string()));
        assert_eq!(config.console_level, LevelFilter::Error);
        assert_eq!(config.file_level, LevelFilter::Debug);
        assert_eq!(config.log_file.as_deref(), Some("run.log"));
    }
}
