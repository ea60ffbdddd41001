//! Message dispatch and lifecycle for host wrapper extensions.
//!
//! The host delivers messages one at a time on a single thread. Each message
//! is unpacked by `wrapext-param`, matched against a static action table, and
//! handled synchronously. Replies are packed into an owning buffer and sent
//! back through a [`HostApplication`] with an empty identifier and the
//! request's [`AsyncId`].

pub mod action;
pub mod config;
pub mod error;
pub mod extension;
pub mod host;
pub mod message;
mod notify;

pub use action::{
    find_action, sample_action, Action, ActionContext, ActionFn, DEFAULT_ACTIONS,
    SAMPLE_ACTION_ID,
};
pub use config::{ExtensionConfig, DEFAULT_COMPONENT_ID, SDK_VERSION};
pub use error::{DispatchError, Result};
pub use extension::{DispatchState, Lifecycle, Outcome, WrapperExtension};
pub use host::{HostApplication, WindowHandle};
pub use message::{AsyncId, Message, Reply};

pub use wrapext_param::{ExtensionParameter, ParamMap};

#[cfg(test)]
pub(crate) mod testing;
