use std::ffi::CString;
use std::ptr::NonNull;

use tracing::warn;
use wrapext_dispatch::{AsyncId, HostApplication, Result};
use wrapext_param::PackedParams;

use crate::types::{ApplicationVTable, IApplication};

/// [`HostApplication`] that calls through the host's `IApplication` table.
pub(crate) struct FfiHost {
    app: NonNull<IApplication>,
}

impl FfiHost {
    /// # Safety
    /// `app` must be null or point to an `IApplication` whose table stays
    /// valid for the lifetime of the extension.
    pub(crate) unsafe fn new(app: *mut IApplication) -> Option<Self> {
        let app = NonNull::new(app)?;
        // SAFETY: Pointer validity is guaranteed by the caller.
        if unsafe { app.as_ref() }.vtable.is_null() {
            return None;
        }
        Some(Self { app })
    }

    fn vtable(&self) -> &ApplicationVTable {
        // SAFETY: Both pointers were validated in `new` and are owned by the host.
        unsafe { &*self.app.as_ref().vtable }
    }
}

impl HostApplication for FfiHost {
    fn set_sdk_version(&self, version: i32) {
        match self.vtable().set_sdk_version {
            // SAFETY: Host-provided entry point, called on the host thread.
            Some(set_sdk_version) => unsafe { set_sdk_version(self.app.as_ptr(), version) },
            None => warn!("host does not implement set_sdk_version"),
        }
    }

    fn register_component_id(&self, component_id: &str) -> Result<()> {
        let component_id = CString::new(component_id)?;
        match self.vtable().register_component_id {
            // SAFETY: `component_id` outlives the call.
            Some(register) => unsafe { register(self.app.as_ptr(), component_id.as_ptr()) },
            None => warn!("host does not implement register_component_id"),
        }
        Ok(())
    }

    fn send_web_message(
        &self,
        message_id: &str,
        params: &PackedParams,
        async_id: AsyncId,
    ) -> Result<()> {
        let message_id = CString::new(message_id)?;
        match self.vtable().send_web_message {
            // SAFETY: `message_id` and `params` (with every text buffer its
            // records point at) outlive the call.
            Some(send) => unsafe {
                send(
                    self.app.as_ptr(),
                    message_id.as_ptr(),
                    params.len(),
                    params.as_ptr(),
                    async_id.value(),
                )
            },
            None => warn!("host does not implement send_web_message"),
        }
        Ok(())
    }
}
