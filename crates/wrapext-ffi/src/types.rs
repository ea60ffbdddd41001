use std::ffi::c_void;
use std::os::raw::c_char;

use wrapext_dispatch::WrapperExtension;
use wrapext_param::{ExtensionParameterPod, NamedExtensionParameterPod};

/// Application interface handed to `WrapperExtInit` by the host.
///
/// The host owns the object; the extension only calls through its table.
#[repr(C)]
#[derive(Debug)]
pub struct IApplication {
    pub vtable: *const ApplicationVTable,
}

#[repr(C)]
#[derive(Debug, Default)]
pub struct ApplicationVTable {
    pub set_sdk_version: Option<unsafe extern "C" fn(app: *mut IApplication, version: i32)>,
    pub register_component_id:
        Option<unsafe extern "C" fn(app: *mut IApplication, component_id: *const c_char)>,
    pub send_web_message: Option<
        unsafe extern "C" fn(
            app: *mut IApplication,
            message_id: *const c_char,
            param_count: usize,
            params: *const NamedExtensionParameterPod,
            async_id: f64,
        ),
    >,
}

/// Extension interface returned to the host by `WrapperExtInit`.
#[repr(C)]
#[derive(Debug)]
pub struct IExtension {
    pub vtable: *const ExtensionVTable,
}

#[repr(C)]
#[derive(Debug)]
pub struct ExtensionVTable {
    pub init: unsafe extern "C" fn(this: *mut IExtension),
    pub release: unsafe extern "C" fn(this: *mut IExtension),
    pub on_main_window_created: unsafe extern "C" fn(this: *mut IExtension, window: *mut c_void),
    pub on_web_message: unsafe extern "C" fn(
        this: *mut IExtension,
        message_id: *const c_char,
        param_count: usize,
        params: *const ExtensionParameterPod,
        async_id: f64,
    ),
}

/// Heap allocation behind every `*mut IExtension` this library returns.
///
/// `iface` must stay the first field so the interface pointer and the handle
/// pointer are interchangeable.
#[repr(C)]
pub(crate) struct ExtensionHandle {
    pub(crate) iface: IExtension,
    /// Application interface the extension registered with.
    pub(crate) app: *mut IApplication,
    pub(crate) extension: WrapperExtension,
}
