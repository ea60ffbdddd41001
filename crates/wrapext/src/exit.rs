use std::fmt;

use wrapext_param::ParamError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Parameter values the CLI builds are rejected input, never an internal fault.
pub fn param_error(context: &str, err: ParamError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn json_error(context: &str, err: serde_json::Error) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_errors_are_data_invalid() {
        let unsupported = param_error("--param #1", ParamError::UnsupportedJson { kind: "array" });
        assert_eq!(unsupported.code, DATA_INVALID);
        assert!(unsupported.message.starts_with("--param #1: "));

        let null_array = param_error("--param #2", ParamError::NullArray { count: 2 });
        assert_eq!(null_array.code, DATA_INVALID);
    }
}
