use std::str::FromStr;

use tracing::level_filters::LevelFilter;

/// Environment variable holding the minimum log level.
pub const LOG_LEVEL_ENV: &str = "WRAPEXT_LOG";
/// Environment variable selecting `text` or `json` log lines.
pub const LOG_FORMAT_ENV: &str = "WRAPEXT_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging settings for the loaded library. The host owns stdout, so logs go
/// to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(LOG_LEVEL_ENV).ok().as_deref(),
            std::env::var(LOG_FORMAT_ENV).ok().as_deref(),
        )
    }

    /// Unparseable values fall back to the defaults.
    pub fn from_values(level: Option<&str>, format: Option<&str>) -> Self {
        let defaults = Self::default();
        let level = level
            .and_then(|value| LevelFilter::from_str(value.trim()).ok())
            .unwrap_or(defaults.level);
        let format = match format.map(|value| value.trim().to_ascii_lowercase()) {
            Some(value) if value == "json" => LogFormat::Json,
            _ => defaults.format,
        };
        Self { level, format }
    }
}

/// Install a stderr subscriber unless the process already has one.
pub fn init_logging(config: LogConfig) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.level)
        .with_ansi(false)
        .with_target(false);

    match config.format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(LogConfig::from_values(None, None), LogConfig::default());
    }

    #[test]
    fn parses_level_and_format() {
        let config = LogConfig::from_values(Some("debug"), Some("JSON"));
        assert_eq!(config.level, LevelFilter::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = LogConfig::from_values(Some("loud"), Some("xml"));
        assert_eq!(config, LogConfig::default());
    }
}
