use wrapext_param::ParamError;

/// Errors that can occur while dispatching messages.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Parameter marshalling failed.
    #[error("parameter error: {0}")]
    Param(#[from] ParamError),

    /// A message arrived while another was still being handled.
    #[error("message {message_id:?} delivered while another message is being handled")]
    Reentrant { message_id: String },

    /// Text bound for the host contains an interior NUL byte.
    #[error("text for the host contains an interior NUL byte: {0}")]
    InteriorNul(#[from] std::ffi::NulError),

    /// The action ran but could not complete.
    #[error("action {action:?} failed: {reason}")]
    ActionFailed { action: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DispatchError>;
