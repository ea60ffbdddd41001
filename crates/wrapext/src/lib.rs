//! Host wrapper extension toolkit.
//!
//! wrapext lets a host desktop application hand typed parameters to a native
//! extension and receive async replies, across a plain C ABI.
//!
//! # Crate Structure
//!
//! - [`param`]: POD wire records and parameter marshalling
//! - [`dispatch`]: Message dispatch, actions, and extension lifecycle
//! - [`ffi`]: C-ABI entry point and interface tables

/// Re-export parameter types.
pub mod param {
    pub use wrapext_param::*;
}

/// Re-export dispatch types.
pub mod dispatch {
    pub use wrapext_dispatch::*;
}

/// Re-export FFI types.
pub mod ffi {
    pub use wrapext_ffi::*;
}
