use serde::Serialize;
use wrapext_param::{
    pack_named, unpack_array, ExtensionParameter, ExtensionParameterPod, PackedParams, ParamMap,
};

use crate::error::Result;

/// Correlation token pairing an async request with its reply.
///
/// The host allocates tokens; [`AsyncId::NONE`] (`-1`) marks a
/// fire-and-forget message that expects no reply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AsyncId(f64);

impl AsyncId {
    pub const NONE: AsyncId = AsyncId(-1.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn expects_reply(self) -> bool {
        self.0 != Self::NONE.0
    }
}

impl Default for AsyncId {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<f64> for AsyncId {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Inbound message: identifier, positional parameters, correlation token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: String,
    pub params: Vec<ExtensionParameter>,
    pub async_id: AsyncId,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        params: Vec<ExtensionParameter>,
        async_id: impl Into<AsyncId>,
    ) -> Self {
        Self {
            id: id.into(),
            params,
            async_id: async_id.into(),
        }
    }

    /// Build a message from the host's wire arguments, copying everything out
    /// of the caller's buffers.
    ///
    /// # Safety
    /// See [`wrapext_param::unpack_array`].
    pub unsafe fn from_wire(
        id: &str,
        param_count: usize,
        params: *const ExtensionParameterPod,
        async_id: f64,
    ) -> Result<Self> {
        // SAFETY: Forwarded to the caller.
        let params = unsafe { unpack_array(param_count, params) }?;
        Ok(Self::new(id, params, async_id))
    }

    /// An empty identifier is reserved for replies.
    pub fn is_reply(&self) -> bool {
        self.id.is_empty()
    }
}

/// Outbound message: identifier, named parameters, correlation token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub id: String,
    pub params: ParamMap,
    pub async_id: AsyncId,
}

impl Reply {
    /// Reply to an async request. Replies are matched by token, so the
    /// identifier is empty.
    pub fn response(params: ParamMap, async_id: AsyncId) -> Self {
        Self {
            id: String::new(),
            params,
            async_id,
        }
    }

    pub fn pack(&self) -> PackedParams {
        pack_named(&self.params)
    }
}

#[cfg(test)]
mod tests {
    use wrapext_param::pack_array;

    use super::*;

    #[test]
    fn sentinel_does_not_expect_reply() {
        assert!(!AsyncId::NONE.expects_reply());
        assert!(!AsyncId::default().expects_reply());
        assert!(AsyncId::new(0.0).expects_reply());
        assert!(AsyncId::new(17.0).expects_reply());
    }

    #[test]
    fn from_wire_copies_parameters() {
        let params = vec![ExtensionParameter::from("a"), ExtensionParameter::from(2.0)];
        let packed = pack_array(&params);
        // SAFETY: `packed` is alive for the call.
        let message = unsafe { Message::from_wire("sample", packed.len(), packed.as_ptr(), 3.0) }
            .unwrap();
        drop(packed);

        assert_eq!(message.id, "sample");
        assert_eq!(message.params, params);
        assert_eq!(message.async_id, AsyncId::new(3.0));
        assert!(!message.is_reply());
    }

    #[test]
    fn from_wire_rejects_null_array() {
        // SAFETY: A null array is rejected before any read.
        let result = unsafe { Message::from_wire("sample", 1, std::ptr::null(), -1.0) };
        assert!(result.is_err());
    }

    #[test]
    fn response_has_empty_identifier() {
        let mut params = ParamMap::new();
        params.insert("result".into(), "success".into());
        let reply = Reply::response(params, AsyncId::new(4.0));

        assert!(reply.id.is_empty());
        assert_eq!(reply.pack().len(), 1);
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"id":"","params":{"result":"success"},"async_id":4.0}"#);
    }
}
