use std::ffi::c_void;
use std::ptr::NonNull;
use std::rc::Rc;

use wrapext_param::PackedParams;

use crate::error::Result;
use crate::message::AsyncId;

/// Native handle of the host's main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(NonNull<c_void>);

impl WindowHandle {
    /// Returns `None` for a null handle.
    pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Calls the extension makes into the host application.
///
/// Implementations are driven from the host-designated thread only.
pub trait HostApplication {
    /// Declare the contract version the extension was built against.
    fn set_sdk_version(&self, version: i32);

    /// Declare the messaging namespace. Called once, during construction.
    fn register_component_id(&self, component_id: &str) -> Result<()>;

    /// Send named parameters to the JavaScript layer.
    ///
    /// `params` owns every text buffer its records point at and stays borrowed
    /// until this call returns.
    fn send_web_message(
        &self,
        message_id: &str,
        params: &PackedParams,
        async_id: AsyncId,
    ) -> Result<()>;
}

impl<H: HostApplication + ?Sized> HostApplication for Rc<H> {
    fn set_sdk_version(&self, version: i32) {
        (**self).set_sdk_version(version);
    }

    fn register_component_id(&self, component_id: &str) -> Result<()> {
        (**self).register_component_id(component_id)
    }

    fn send_web_message(
        &self,
        message_id: &str,
        params: &PackedParams,
        async_id: AsyncId,
    ) -> Result<()> {
        (**self).send_web_message(message_id, params, async_id)
    }
}
