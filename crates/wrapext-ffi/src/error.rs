use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use wrapext_dispatch::DispatchError;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::new("").expect("empty CString should be valid"));
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new("").expect("empty CString should be valid");
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let message = message.into();
    let sanitized = message.replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized)
            .unwrap_or_else(|_| CString::new("internal error").expect("literal is valid"));
    });
}

pub(crate) fn set_invalid_argument(message: impl Into<String>) {
    let message = message.into();
    tracing::warn!("{message}");
    set_error_message(message);
}

pub(crate) fn set_panic_error() {
    tracing::error!("panic across FFI boundary");
    set_error_message("panic across FFI boundary");
}

pub(crate) fn record_dispatch_error(err: &DispatchError) {
    set_error_message(err.to_string());
}

/// The pointer stays valid until the next exported call on this thread,
/// since every export clears or replaces the message first.
pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}

/// Current thread's last error as an owned string. Empty when none.
pub fn last_error() -> String {
    LAST_ERROR.with(|state| state.borrow().to_string_lossy().into_owned())
}
