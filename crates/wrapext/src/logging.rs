use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Flag values mapped onto the subscriber settings the library uses when the
/// host loads it, so CLI and host runs log the same way.
fn log_config(format: LogFormat, level: LogLevel) -> wrapext_ffi::LogConfig {
    wrapext_ffi::LogConfig {
        level: level.into(),
        format: match format {
            LogFormat::Text => wrapext_ffi::LogFormat::Text,
            LogFormat::Json => wrapext_ffi::LogFormat::Json,
        },
    }
}

pub fn init_logging(format: LogFormat, level: LogLevel) {
    wrapext_ffi::init_logging(log_config(format, level));
}
