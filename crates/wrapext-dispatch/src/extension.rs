use std::cell::Cell;

use tracing::{debug, info, trace, warn};
use wrapext_param::{pack_named, ExtensionParameterPod, ParamMap};

use crate::action::{find_action, Action, ActionContext, DEFAULT_ACTIONS};
use crate::config::ExtensionConfig;
use crate::error::{DispatchError, Result};
use crate::host::{HostApplication, WindowHandle};
use crate::message::{AsyncId, Message};

/// Whether a message is currently being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Handling,
}

/// Host-driven lifecycle of the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed and registered with the host.
    Constructed,
    /// `init` was called after all extensions loaded.
    Initialized,
    /// `release` was called; the host is shutting down.
    Released,
}

/// Result of delivering one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// An action matched and ran to completion.
    Handled,
    /// No action is registered for the identifier.
    Ignored,
}

/// Restores [`DispatchState::Idle`] when handling ends, including on unwind.
struct HandlingGuard<'a> {
    state: &'a Cell<DispatchState>,
}

impl<'a> HandlingGuard<'a> {
    fn enter(state: &'a Cell<DispatchState>, message_id: &str) -> Result<Self> {
        if state.get() == DispatchState::Handling {
            return Err(DispatchError::Reentrant {
                message_id: message_id.to_string(),
            });
        }
        state.set(DispatchState::Handling);
        Ok(Self { state })
    }
}

impl Drop for HandlingGuard<'_> {
    fn drop(&mut self) {
        self.state.set(DispatchState::Idle);
    }
}

/// The extension instance the host talks to.
///
/// All methods take `&self`: the host may call back into the extension while
/// an action is talking to it, and the FFI layer never holds an exclusive
/// borrow across a host call.
pub struct WrapperExtension {
    host: Box<dyn HostApplication>,
    config: ExtensionConfig,
    actions: &'static [Action],
    main_window: Cell<Option<WindowHandle>>,
    state: Cell<DispatchState>,
    lifecycle: Cell<Lifecycle>,
}

impl WrapperExtension {
    /// Construct with [`DEFAULT_ACTIONS`], declaring the SDK version and
    /// registering the component identifier with the host.
    pub fn new(host: Box<dyn HostApplication>, config: ExtensionConfig) -> Result<Self> {
        Self::with_actions(host, config, DEFAULT_ACTIONS)
    }

    pub fn with_actions(
        host: Box<dyn HostApplication>,
        config: ExtensionConfig,
        actions: &'static [Action],
    ) -> Result<Self> {
        host.set_sdk_version(config.sdk_version);
        host.register_component_id(&config.component_id)?;
        info!(
            component_id = %config.component_id,
            sdk_version = config.sdk_version,
            actions = actions.len(),
            "extension registered"
        );

        Ok(Self {
            host,
            config,
            actions,
            main_window: Cell::new(None),
            state: Cell::new(DispatchState::Idle),
            lifecycle: Cell::new(Lifecycle::Constructed),
        })
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    pub fn state(&self) -> DispatchState {
        self.state.get()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    pub fn main_window(&self) -> Option<WindowHandle> {
        self.main_window.get()
    }

    /// Called once all other extensions are loaded.
    pub fn init(&self) {
        debug!("extension init");
        self.lifecycle.set(Lifecycle::Initialized);
    }

    /// Called before process exit.
    pub fn release(&self) {
        debug!("extension release");
        self.main_window.set(None);
        self.lifecycle.set(Lifecycle::Released);
    }

    /// Called once when the main window exists. The handle is kept for
    /// actions that need a dialog owner.
    pub fn on_main_window_created(&self, window: Option<WindowHandle>) {
        debug!(has_window = window.is_some(), "main window created");
        self.main_window.set(window);
    }

    /// Deliver a message straight from the host's wire arguments.
    ///
    /// # Safety
    /// See [`wrapext_param::unpack_array`].
    pub unsafe fn on_web_message_raw(
        &self,
        message_id: &str,
        param_count: usize,
        params: *const ExtensionParameterPod,
        async_id: f64,
    ) -> Result<Outcome> {
        // SAFETY: Forwarded to the caller.
        let message = unsafe { Message::from_wire(message_id, param_count, params, async_id) }?;
        self.on_web_message(&message)
    }

    /// Run the action registered for `message.id`, if any, on this thread.
    ///
    /// Unknown identifiers are ignored without a reply.
    pub fn on_web_message(&self, message: &Message) -> Result<Outcome> {
        let _guard = HandlingGuard::enter(&self.state, &message.id).inspect_err(|err| {
            warn!(error = %err, "rejected re-entrant message");
        })?;

        let Some(action) = find_action(self.actions, &message.id) else {
            trace!(message_id = %message.id, "no action registered, ignoring message");
            return Ok(Outcome::Ignored);
        };

        debug!(
            message_id = %message.id,
            params = message.params.len(),
            async_id = message.async_id.value(),
            "dispatching message"
        );

        let ctx = ActionContext {
            message,
            host: self.host.as_ref(),
            config: &self.config,
            main_window: self.main_window.get(),
        };
        (action.run)(&ctx).inspect_err(|err| {
            warn!(message_id = %message.id, error = %err, "action failed");
        })?;

        Ok(Outcome::Handled)
    }

    /// Send named parameters to the JavaScript layer.
    pub fn send_web_message(
        &self,
        message_id: &str,
        params: &ParamMap,
        async_id: AsyncId,
    ) -> Result<()> {
        let packed = pack_named(params);
        self.host.send_web_message(message_id, &packed, async_id)
    }

    /// Resolve a pending async request, possibly after the handler returned.
    ///
    /// The token is not checked against outstanding requests; replying with a
    /// stale or fire-and-forget token is the caller's responsibility.
    pub fn send_async_response(&self, params: &ParamMap, async_id: AsyncId) -> Result<()> {
        if !async_id.expects_reply() {
            debug!("async response sent with the fire-and-forget token");
        }
        self.send_web_message("", params, async_id)
    }
}

impl std::fmt::Debug for WrapperExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapperExtension")
            .field("config", &self.config)
            .field("actions", &self.actions)
            .field("main_window", &self.main_window.get())
            .field("state", &self.state.get())
            .field("lifecycle", &self.lifecycle.get())
            .finish_non_exhaustive()
    }
}
