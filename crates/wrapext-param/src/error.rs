/// Errors that can occur while marshalling parameters.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// The record array pointer was null while the count was nonzero.
    #[error("parameter array is null but count is {count}")]
    NullArray { count: usize },

    /// A JSON value has no extension parameter equivalent.
    #[error("unsupported JSON value for an extension parameter: {kind}")]
    UnsupportedJson { kind: &'static str },
}

pub type Result<T> = std::result::Result<T, ParamError>;
