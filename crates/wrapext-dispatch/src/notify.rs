use tracing::info;

use crate::error::Result;
use crate::host::WindowHandle;

/// Show a modal message owned by `owner`, or by the desktop when `None`.
#[cfg(windows)]
pub(crate) fn show_message_box(owner: Option<WindowHandle>, text: &str, caption: &str) -> Result<()> {
    use windows_sys::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_OK};

    use crate::error::DispatchError;

    let text: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
    let caption: Vec<u16> = caption.encode_utf16().chain(std::iter::once(0)).collect();
    let owner = owner.map_or(std::ptr::null_mut(), WindowHandle::as_ptr);

    // SAFETY: Both strings are NUL-terminated and outlive the call.
    let pressed = unsafe { MessageBoxW(owner, text.as_ptr(), caption.as_ptr(), MB_OK) };
    if pressed == 0 {
        return Err(DispatchError::ActionFailed {
            action: "message box".to_string(),
            reason: std::io::Error::last_os_error().to_string(),
        });
    }
    Ok(())
}

#[cfg(not(windows))]
pub(crate) fn show_message_box(owner: Option<WindowHandle>, text: &str, caption: &str) -> Result<()> {
    log_message(owner, text, caption);
    Ok(())
}

pub(crate) fn log_message(owner: Option<WindowHandle>, text: &str, caption: &str) {
    info!(caption, has_owner = owner.is_some(), "{text}");
}
