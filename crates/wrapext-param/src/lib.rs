//! Typed parameter marshalling across a C ABI boundary.
//!
//! The host and the extension exchange parameters as plain-old-data records:
//! - A 1-byte type discriminant (null, boolean, number, text)
//! - A payload union (byte, `f64`, or pointer/length text)
//! - For named records, a pointer/length name
//!
//! This crate is the single place where those records are converted to and
//! from [`ExtensionParameter`]. Inbound text is copied out immediately; outbound
//! text is staged in owning buffers ([`PackedParams`], [`PackedArray`]) that lend
//! the record slice only for as long as they are alive.

pub mod codec;
pub mod error;
pub mod value;
pub mod wire;

pub use codec::{
    pack_array, pack_named, unpack_array, unpack_named_array, unpack_named_slice,
    unpack_parameter, unpack_slice, PackedArray, PackedParams,
};
pub use error::{ParamError, Result};
pub use value::{ExtensionParameter, ParamMap};
pub use wire::{
    ExtensionParameterPod, NamedExtensionParameterPod, ParamPayload, ParamType, WireStr, WireText,
    PARAM_BOOLEAN, PARAM_NULL, PARAM_NUMBER, PARAM_TEXT,
};
