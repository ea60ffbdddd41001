//! wrapext-ffi: C-ABI exports for a host wrapper extension.
//!
//! The host loads this library, calls [`WrapperExtInit`] once with its
//! application interface, and from then on talks to the returned extension
//! interface on a single thread.

mod args;
mod config;
mod error;
mod extension;
mod host;
mod logging;
mod types;

use std::os::raw::c_char;
use std::panic::AssertUnwindSafe;

pub use config::{config_from_env, COMPONENT_ID_ENV, NATIVE_DIALOGS_ENV};
pub use error::last_error;
pub use extension::{create_extension, with_extension};
pub use logging::{init_logging, LogConfig, LogFormat, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
pub use types::{ApplicationVTable, ExtensionVTable, IApplication, IExtension};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Library entry point, called once by the host at load time.
///
/// Logging and extension settings are read from the environment.
///
/// # Safety
/// `app` must be null or a valid application interface that outlives the
/// extension.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn WrapperExtInit(app: *mut IApplication) -> *mut IExtension {
    ffi_boundary(std::ptr::null_mut(), || {
        init_logging(LogConfig::from_env());
        // SAFETY: Forwarded to the caller.
        unsafe { create_extension(app, config_from_env()) }
    })
}

#[no_mangle]
pub extern "C" fn wrapext_sdk_version() -> i32 {
    wrapext_dispatch::SDK_VERSION
}

#[no_mangle]
pub extern "C" fn wrapext_last_error() -> *const c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}
