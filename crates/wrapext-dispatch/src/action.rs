use tracing::debug;
use wrapext_param::{ExtensionParameter, ParamMap};

use crate::config::ExtensionConfig;
use crate::error::Result;
use crate::host::{HostApplication, WindowHandle};
use crate::message::{AsyncId, Message, Reply};
use crate::notify;

/// Identifier of the demonstration action.
pub const SAMPLE_ACTION_ID: &str = "sample";

pub type ActionFn = fn(&ActionContext<'_>) -> Result<()>;

/// One entry of the static identifier-to-action table.
#[derive(Clone, Copy)]
pub struct Action {
    pub id: &'static str,
    pub run: ActionFn,
}

impl Action {
    pub const fn new(id: &'static str, run: ActionFn) -> Self {
        Self { id, run }
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action").field("id", &self.id).finish()
    }
}

/// Actions compiled into the extension.
pub static DEFAULT_ACTIONS: &[Action] = &[Action::new(SAMPLE_ACTION_ID, sample_action)];

pub fn find_action<'a>(actions: &'a [Action], id: &str) -> Option<&'a Action> {
    actions.iter().find(|action| action.id == id)
}

/// Everything an action can see while it handles one message.
pub struct ActionContext<'a> {
    pub(crate) message: &'a Message,
    pub(crate) host: &'a dyn HostApplication,
    pub(crate) config: &'a ExtensionConfig,
    pub(crate) main_window: Option<WindowHandle>,
}

impl ActionContext<'_> {
    pub fn message_id(&self) -> &str {
        &self.message.id
    }

    pub fn params(&self) -> &[ExtensionParameter] {
        &self.message.params
    }

    pub fn param(&self, index: usize) -> Option<&ExtensionParameter> {
        self.message.params.get(index)
    }

    pub fn async_id(&self) -> AsyncId {
        self.message.async_id
    }

    pub fn config(&self) -> &ExtensionConfig {
        self.config
    }

    pub fn main_window(&self) -> Option<WindowHandle> {
        self.main_window
    }

    /// Reply to the message being handled.
    ///
    /// Fire-and-forget messages get no reply; returns whether one was sent.
    pub fn reply(&self, params: ParamMap) -> Result<bool> {
        let async_id = self.message.async_id;
        if !async_id.expects_reply() {
            debug!(message_id = %self.message.id, "message is fire-and-forget, reply skipped");
            return Ok(false);
        }

        let reply = Reply::response(params, async_id);
        let packed = reply.pack();
        self.host.send_web_message(&reply.id, &packed, async_id)?;
        Ok(true)
    }

    /// Show a notification to the user, as a native dialog when enabled.
    pub fn notify(&self, text: &str, caption: &str) -> Result<()> {
        if self.config.native_dialogs {
            notify::show_message_box(self.main_window, text, caption)
        } else {
            notify::log_message(self.main_window, text, caption);
            Ok(())
        }
    }
}

/// Shows a message box, then resolves the JavaScript promise with
/// `{ "result": "success" }` when the message was sent async.
pub fn sample_action(ctx: &ActionContext<'_>) -> Result<()> {
    ctx.notify("Sample action executed!", "Wrapper Extension")?;

    let mut params = ParamMap::new();
    params.insert("result".to_string(), "success".into());
    ctx.reply(params)?;
    Ok(())
}
