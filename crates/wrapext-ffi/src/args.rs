use std::ffi::CStr;
use std::os::raw::c_char;

use crate::error;

/// Convert a required C string argument into UTF-8 `&str`.
///
/// # Safety
/// `value` must be null or point to a valid NUL-terminated C string.
pub(crate) unsafe fn required_str_arg<'a>(value: *const c_char, name: &str) -> Option<&'a str> {
    if value.is_null() {
        error::set_invalid_argument(format!("{name} cannot be null"));
        return None;
    }

    let as_cstr = {
        // SAFETY: The caller guarantees `value` points to a valid NUL-terminated C string.
        unsafe { CStr::from_ptr(value) }
    };

    match as_cstr.to_str() {
        Ok(v) => Some(v),
        Err(_) => {
            error::set_invalid_argument(format!("{name} must be valid UTF-8"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::CString;

    use super::*;

    #[test]
    fn null_argument_sets_error() {
        error::clear_error_state();
        // SAFETY: Null is checked before any read.
        let value = unsafe { required_str_arg(std::ptr::null(), "message_id") };
        assert!(value.is_none());
        assert_eq!(error::last_error(), "message_id cannot be null");
    }

    #[test]
    fn invalid_utf8_sets_error() {
        error::clear_error_state();
        let raw = CString::new(vec![0xC3, 0x28]).unwrap();
        // SAFETY: `raw` is a valid NUL-terminated string.
        let value = unsafe { required_str_arg(raw.as_ptr(), "message_id") };
        assert!(value.is_none());
        assert_eq!(error::last_error(), "message_id must be valid UTF-8");
    }

    #[test]
    fn valid_argument_borrows() {
        let raw = CString::new("sample").unwrap();
        // SAFETY: `raw` is a valid NUL-terminated string that outlives `value`.
        let value = unsafe { required_str_arg(raw.as_ptr(), "message_id") };
        assert_eq!(value, Some("sample"));
    }
}
