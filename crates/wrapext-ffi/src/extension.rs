use std::ffi::c_void;
use std::os::raw::c_char;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use tracing::warn;
use wrapext_dispatch::{ExtensionConfig, WindowHandle, WrapperExtension};
use wrapext_param::ExtensionParameterPod;

use crate::args;
use crate::error;
use crate::host::FfiHost;
use crate::types::{ExtensionHandle, ExtensionVTable, IApplication, IExtension};

/// The single live extension, created by `WrapperExtInit` and freed by `release`.
///
/// The host creates one instance and drives it from one thread; the atomic
/// only makes the pointer storable in a `static`.
static INSTANCE: AtomicPtr<ExtensionHandle> = AtomicPtr::new(ptr::null_mut());

static EXTENSION_VTABLE: ExtensionVTable = ExtensionVTable {
    init: ext_init,
    release: ext_release,
    on_main_window_created: ext_on_main_window_created,
    on_web_message: ext_on_web_message,
};

/// Create the extension for `app`, or return the live one if it exists.
///
/// Returns null and sets the last error when `app` is null or registration
/// fails.
///
/// # Safety
/// `app` must be null or a valid application interface that outlives the
/// extension.
pub unsafe fn create_extension(app: *mut IApplication, config: ExtensionConfig) -> *mut IExtension {
    crate::ffi_boundary(ptr::null_mut(), || {
        error::clear_error_state();

        let host = {
            // SAFETY: Pointer validity is guaranteed by the caller.
            match unsafe { FfiHost::new(app) } {
                Some(host) => host,
                None => {
                    error::set_invalid_argument("application interface cannot be null");
                    return ptr::null_mut();
                }
            }
        };

        let existing = INSTANCE.load(Ordering::Acquire);
        if !existing.is_null() {
            // SAFETY: Non-null instances stay allocated until `release` clears them.
            let bound = unsafe { (*existing).app };
            if bound == app {
                warn!("extension already initialized, returning the live instance");
            } else {
                warn!(
                    bound = ?bound,
                    requested = ?app,
                    "extension already initialized for another application interface; \
                     replies still go to the first one"
                );
            }
            return existing.cast();
        }

        let extension = match WrapperExtension::new(Box::new(host), config) {
            Ok(extension) => extension,
            Err(err) => {
                error::record_dispatch_error(&err);
                return ptr::null_mut();
            }
        };

        let handle = Box::into_raw(Box::new(ExtensionHandle {
            iface: IExtension {
                vtable: &EXTENSION_VTABLE,
            },
            app,
            extension,
        }));
        INSTANCE.store(handle, Ordering::Release);
        handle.cast()
    })
}

/// Run `f` against the live extension, e.g. to send a deferred async reply.
///
/// Returns `None` before `WrapperExtInit` or after `release`.
///
/// # Safety
/// Must be called on the host-designated thread, outside of `release`.
pub unsafe fn with_extension<T>(f: impl FnOnce(&WrapperExtension) -> T) -> Option<T> {
    let handle = INSTANCE.load(Ordering::Acquire);
    if handle.is_null() {
        return None;
    }

    // SAFETY: Non-null instances stay allocated until `release` clears them.
    let handle = unsafe { &*handle };
    Some(f(&handle.extension))
}

fn with_handle<T>(this: *mut IExtension, on_error: T, f: impl FnOnce(&ExtensionHandle) -> T) -> T {
    if this.is_null() {
        error::set_invalid_argument("extension handle cannot be null");
        return on_error;
    }

    let handle = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &*(this as *const ExtensionHandle) }
    };

    f(handle)
}

unsafe extern "C" fn ext_init(this: *mut IExtension) {
    crate::ffi_boundary((), || {
        error::clear_error_state();
        with_handle(this, (), |handle| handle.extension.init());
    });
}

unsafe extern "C" fn ext_release(this: *mut IExtension) {
    crate::ffi_boundary((), || {
        error::clear_error_state();

        if this.is_null() {
            error::set_invalid_argument("extension handle cannot be null");
            return;
        }

        let handle = this.cast::<ExtensionHandle>();
        // SAFETY: Non-null handles passed to the table were allocated by `create_extension`.
        unsafe { (*handle).extension.release() };

        let _ = INSTANCE.compare_exchange(
            handle,
            ptr::null_mut(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );

        // SAFETY: The host makes no further calls on this handle after `release`.
        unsafe {
            drop(Box::from_raw(handle));
        }
    });
}

unsafe extern "C" fn ext_on_main_window_created(this: *mut IExtension, window: *mut c_void) {
    crate::ffi_boundary((), || {
        error::clear_error_state();
        with_handle(this, (), |handle| {
            handle
                .extension
                .on_main_window_created(WindowHandle::from_raw(window));
        });
    });
}

unsafe extern "C" fn ext_on_web_message(
    this: *mut IExtension,
    message_id: *const c_char,
    param_count: usize,
    params: *const ExtensionParameterPod,
    async_id: f64,
) {
    crate::ffi_boundary((), || {
        error::clear_error_state();

        let message_id = {
            // SAFETY: We validate null and UTF-8 in helper.
            match unsafe { args::required_str_arg(message_id, "message_id") } {
                Some(v) => v,
                None => return,
            }
        };

        with_handle(this, (), |handle| {
            // SAFETY: The host keeps `params` readable for the duration of this call.
            let result = unsafe {
                handle
                    .extension
                    .on_web_message_raw(message_id, param_count, params, async_id)
            };
            if let Err(err) = result {
                error::record_dispatch_error(&err);
            }
        });
    });
}
