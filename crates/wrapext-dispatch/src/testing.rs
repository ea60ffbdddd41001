use std::cell::RefCell;

use wrapext_param::{unpack_named_slice, PackedParams};

use crate::error::Result;
use crate::host::HostApplication;
use crate::message::{AsyncId, Reply};

/// Host double that decodes and records every outbound call.
#[derive(Default)]
pub(crate) struct RecordingHost {
    sdk_versions: RefCell<Vec<i32>>,
    component_ids: RefCell<Vec<String>>,
    sent: RefCell<Vec<Reply>>,
}

impl RecordingHost {
    pub(crate) fn sdk_versions(&self) -> Vec<i32> {
        self.sdk_versions.borrow().clone()
    }

    pub(crate) fn component_ids(&self) -> Vec<String> {
        self.component_ids.borrow().clone()
    }

    pub(crate) fn sent(&self) -> Vec<Reply> {
        self.sent.borrow().clone()
    }
}

impl HostApplication for RecordingHost {
    fn set_sdk_version(&self, version: i32) {
        self.sdk_versions.borrow_mut().push(version);
    }

    fn register_component_id(&self, component_id: &str) -> Result<()> {
        self.component_ids
            .borrow_mut()
            .push(component_id.to_string());
        Ok(())
    }

    fn send_web_message(
        &self,
        message_id: &str,
        params: &PackedParams,
        async_id: AsyncId,
    ) -> Result<()> {
        // SAFETY: `params` owns its text buffers for the duration of this call.
        let params = unsafe { unpack_named_slice(params.as_slice()) };
        self.sent.borrow_mut().push(Reply {
            id: message_id.to_string(),
            params,
            async_id,
        });
        Ok(())
    }
}
