use std::borrow::Cow;
use std::fmt;

/// Wire discriminant: absent value.
pub const PARAM_NULL: u8 = 0;
/// Wire discriminant: boolean stored as a byte.
pub const PARAM_BOOLEAN: u8 = 1;
/// Wire discriminant: IEEE 754 double.
pub const PARAM_NUMBER: u8 = 2;
/// Wire discriminant: UTF-8 text as pointer/length.
pub const PARAM_TEXT: u8 = 3;

/// Known parameter types.
///
/// The wire record carries the discriminant as a raw byte; this enum is only
/// produced through [`ParamType::from_raw`], so an unknown byte never becomes
/// an invalid enum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Null,
    Boolean,
    Number,
    Text,
}

impl ParamType {
    pub fn from_raw(kind: u8) -> Option<Self> {
        match kind {
            PARAM_NULL => Some(Self::Null),
            PARAM_BOOLEAN => Some(Self::Boolean),
            PARAM_NUMBER => Some(Self::Number),
            PARAM_TEXT => Some(Self::Text),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u8 {
        match self {
            Self::Null => PARAM_NULL,
            Self::Boolean => PARAM_BOOLEAN,
            Self::Number => PARAM_NUMBER,
            Self::Text => PARAM_TEXT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Text => "text",
        }
    }
}

/// Pointer/length text on the wire. Not NUL-terminated.
///
/// A null pointer with zero length is the empty string.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WireText {
    pub ptr: *const u8,
    pub len: usize,
}

impl WireText {
    pub const EMPTY: WireText = WireText {
        ptr: std::ptr::null(),
        len: 0,
    };

    /// Describe `bytes` without taking ownership. The caller keeps `bytes`
    /// alive for as long as the returned record is read.
    pub(crate) fn describe(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::EMPTY;
        }
        Self {
            ptr: bytes.as_ptr(),
            len: bytes.len(),
        }
    }
}

impl Default for WireText {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Borrowed view of inbound text, valid only for the duration of the call
/// that delivered it.
#[derive(Clone, Copy)]
pub struct WireStr<'a> {
    bytes: &'a [u8],
}

impl<'a> WireStr<'a> {
    /// Build a view from a raw pointer/length pair.
    ///
    /// Returns `None` when `ptr` is null and `len > 0`.
    ///
    /// # Safety
    /// If `len > 0`, `ptr` must be readable for `len` bytes for the lifetime `'a`.
    pub unsafe fn from_raw(ptr: *const u8, len: usize) -> Option<Self> {
        if len == 0 {
            return Some(Self::from_bytes(&[]));
        }
        if ptr.is_null() {
            return None;
        }

        // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
        let bytes = unsafe { std::slice::from_raw_parts(ptr, len) };
        Some(Self::from_bytes(bytes))
    }

    /// # Safety
    /// See [`WireStr::from_raw`].
    pub unsafe fn from_wire(text: WireText) -> Option<Self> {
        // SAFETY: Forwarded to the caller.
        unsafe { Self::from_raw(text.ptr, text.len) }
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode as UTF-8, replacing invalid sequences.
    pub fn to_str_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }

    /// Copy the text out of the wire buffer.
    pub fn into_owned(self) -> String {
        self.to_str_lossy().into_owned()
    }
}

impl fmt::Debug for WireStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WireStr").field(&self.to_str_lossy()).finish()
    }
}

/// Payload of a parameter record, selected by the record's discriminant.
#[repr(C)]
#[derive(Clone, Copy)]
pub union ParamPayload {
    /// Nonzero is `true`.
    pub boolean: u8,
    pub number: f64,
    pub text: WireText,
}

/// POD parameter record: `{ kind, payload }`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ExtensionParameterPod {
    pub kind: u8,
    pub payload: ParamPayload,
}

impl ExtensionParameterPod {
    pub fn null() -> Self {
        Self {
            kind: PARAM_NULL,
            payload: ParamPayload {
                text: WireText::EMPTY,
            },
        }
    }

    pub fn boolean(value: bool) -> Self {
        let mut pod = Self::null();
        pod.kind = PARAM_BOOLEAN;
        pod.payload.boolean = u8::from(value);
        pod
    }

    pub fn number(value: f64) -> Self {
        Self {
            kind: PARAM_NUMBER,
            payload: ParamPayload { number: value },
        }
    }

    pub fn text(text: WireText) -> Self {
        Self {
            kind: PARAM_TEXT,
            payload: ParamPayload { text },
        }
    }

    /// A record with an arbitrary discriminant and a zeroed payload.
    pub fn with_raw_kind(kind: u8) -> Self {
        Self {
            kind,
            ..Self::null()
        }
    }

    pub fn param_type(&self) -> Option<ParamType> {
        ParamType::from_raw(self.kind)
    }
}

impl Default for ExtensionParameterPod {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for ExtensionParameterPod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ExtensionParameterPod");
        out.field("kind", &self.kind);
        // SAFETY: Each arm reads the union field selected by the discriminant.
        unsafe {
            match self.param_type() {
                Some(ParamType::Boolean) => out.field("boolean", &self.payload.boolean),
                Some(ParamType::Number) => out.field("number", &self.payload.number),
                Some(ParamType::Text) => out.field("text", &self.payload.text),
                Some(ParamType::Null) | None => &mut out,
            };
        }
        out.finish()
    }
}

/// POD named parameter record: `{ name, value }`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedExtensionParameterPod {
    pub name: WireText,
    pub value: ExtensionParameterPod,
}
