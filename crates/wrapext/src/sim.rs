use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use serde::Serialize;
use tracing::debug;
use wrapext_dispatch::{AsyncId, ExtensionConfig, Reply};
use wrapext_ffi::{
    create_extension, last_error, ApplicationVTable, ExtensionVTable, IApplication, IExtension,
};
use wrapext_param::{pack_array, unpack_named_array, ExtensionParameter, NamedExtensionParameterPod};

use crate::exit::{CliError, CliResult, FAILURE, USAGE};

/// Everything the extension sent to the simulated host.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Transcript {
    pub sdk_versions: Vec<i32>,
    pub component_ids: Vec<String>,
    pub messages: Vec<Reply>,
}

thread_local! {
    static TRANSCRIPT: RefCell<Transcript> = RefCell::new(Transcript::default());
}

unsafe extern "C" fn sim_set_sdk_version(_app: *mut IApplication, version: i32) {
    TRANSCRIPT.with(|t| t.borrow_mut().sdk_versions.push(version));
}

unsafe extern "C" fn sim_register_component_id(_app: *mut IApplication, component_id: *const c_char) {
    if component_id.is_null() {
        return;
    }
    // SAFETY: The extension passes a NUL-terminated string valid for the call.
    let id = unsafe { CStr::from_ptr(component_id) }.to_string_lossy().into_owned();
    TRANSCRIPT.with(|t| t.borrow_mut().component_ids.push(id));
}

unsafe extern "C" fn sim_send_web_message(
    _app: *mut IApplication,
    message_id: *const c_char,
    param_count: usize,
    params: *const NamedExtensionParameterPod,
    async_id: f64,
) {
    let id = if message_id.is_null() {
        String::new()
    } else {
        // SAFETY: The extension passes a NUL-terminated string valid for the call.
        unsafe { CStr::from_ptr(message_id) }.to_string_lossy().into_owned()
    };
    // SAFETY: Records and their text stay valid for the call; everything is copied here.
    let params = unsafe { unpack_named_array(param_count, params) }.unwrap_or_default();
    debug!(message_id = %id, params = params.len(), async_id, "host received message");

    TRANSCRIPT.with(|t| {
        t.borrow_mut().messages.push(Reply {
            id,
            params,
            async_id: AsyncId::new(async_id),
        })
    });
}

static SIM_VTABLE: ApplicationVTable = ApplicationVTable {
    set_sdk_version: Some(sim_set_sdk_version),
    register_component_id: Some(sim_register_component_id),
    send_web_message: Some(sim_send_web_message),
};

/// A loaded extension driven through its C interface tables, the way the
/// host application drives it.
pub struct HostSession {
    _app: Box<IApplication>,
    ext: *mut IExtension,
}

impl HostSession {
    /// Load the extension and run the startup calls (`init`, then
    /// `on_main_window_created` with no window).
    pub fn start(config: ExtensionConfig) -> CliResult<Self> {
        TRANSCRIPT.with(|t| *t.borrow_mut() = Transcript::default());

        let mut app = Box::new(IApplication {
            vtable: &SIM_VTABLE,
        });
        // SAFETY: `app` is heap-allocated and outlives the extension, which is
        // released before the session drops it.
        let ext = unsafe { create_extension(&mut *app, config) };
        if ext.is_null() {
            return Err(CliError::new(
                FAILURE,
                format!("extension failed to load: {}", last_error()),
            ));
        }

        let session = Self { _app: app, ext };
        let table = session.table();
        // SAFETY: `ext` is live until `release`.
        unsafe {
            (table.init)(session.ext);
            (table.on_main_window_created)(session.ext, ptr::null_mut());
        }
        Ok(session)
    }

    fn table(&self) -> &ExtensionVTable {
        // SAFETY: `ext` is non-null and its table is static.
        unsafe { &*(*self.ext).vtable }
    }

    /// Deliver one message through `on_web_message`.
    pub fn deliver(
        &self,
        message_id: &str,
        params: &[ExtensionParameter],
        async_id: AsyncId,
    ) -> CliResult<()> {
        let id = CString::new(message_id)
            .map_err(|_| CliError::new(USAGE, "message id cannot contain a NUL byte"))?;
        let packed = pack_array(params);

        // SAFETY: `id` and `packed` outlive the call.
        unsafe {
            (self.table().on_web_message)(
                self.ext,
                id.as_ptr(),
                packed.len(),
                packed.as_ptr(),
                async_id.value(),
            );
        }

        let error = last_error();
        if !error.is_empty() {
            return Err(CliError::new(
                FAILURE,
                format!("message {message_id:?} failed: {error}"),
            ));
        }
        Ok(())
    }

    /// Release the extension and return what it sent.
    pub fn finish(mut self) -> Transcript {
        self.release();
        TRANSCRIPT.with(|t| t.borrow().clone())
    }

    fn release(&mut self) {
        if self.ext.is_null() {
            return;
        }
        // SAFETY: Last call on `ext`; the pointer is cleared right after.
        unsafe { (self.table().release)(self.ext) };
        self.ext = ptr::null_mut();
    }
}

impl Drop for HostSession {
    fn drop(&mut self) {
        self.release();
    }
}
