use tracing::warn;

use crate::error::{ParamError, Result};
use crate::value::{ExtensionParameter, ParamMap};
use crate::wire::{ExtensionParameterPod, NamedExtensionParameterPod, ParamType, WireStr, WireText};

/// Decode a single wire record into an owned value.
///
/// Unknown discriminants decode as [`ExtensionParameter::Null`] so that one
/// field from a newer host does not break the rest of the payload. Text is
/// copied out of the wire buffer before this function returns.
///
/// # Safety
/// If `pod.kind` is [`crate::PARAM_TEXT`] and the text length is nonzero, the
/// text pointer must be readable for that many bytes.
pub unsafe fn unpack_parameter(pod: &ExtensionParameterPod) -> ExtensionParameter {
    // SAFETY: Each arm reads the union field selected by the discriminant.
    match pod.param_type() {
        Some(ParamType::Null) => ExtensionParameter::Null,
        Some(ParamType::Boolean) => ExtensionParameter::Boolean(unsafe { pod.payload.boolean } != 0),
        Some(ParamType::Number) => ExtensionParameter::Number(unsafe { pod.payload.number }),
        Some(ParamType::Text) => {
            let text = unsafe { pod.payload.text };
            // SAFETY: Pointer validity for the call is guaranteed by the caller.
            match unsafe { WireStr::from_wire(text) } {
                Some(view) => ExtensionParameter::Text(view.into_owned()),
                None => {
                    warn!(len = text.len, "text parameter has a null pointer, decoding as null");
                    ExtensionParameter::Null
                }
            }
        }
        None => {
            warn!(kind = pod.kind, "unknown parameter type, decoding as null");
            ExtensionParameter::Null
        }
    }
}

/// Decode a slice of wire records, preserving order and length.
///
/// # Safety
/// Every text record in `records` must satisfy [`unpack_parameter`]'s contract.
pub unsafe fn unpack_slice(records: &[ExtensionParameterPod]) -> Vec<ExtensionParameter> {
    records
        .iter()
        // SAFETY: Forwarded to the caller.
        .map(|pod| unsafe { unpack_parameter(pod) })
        .collect()
}

/// Decode `count` records starting at `arr`.
///
/// A zero count yields an empty vector whatever `arr` is.
///
/// # Safety
/// If `count > 0`, `arr` must be null or readable for `count` records, each
/// satisfying [`unpack_parameter`]'s contract.
pub unsafe fn unpack_array(
    count: usize,
    arr: *const ExtensionParameterPod,
) -> Result<Vec<ExtensionParameter>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if arr.is_null() {
        return Err(ParamError::NullArray { count });
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    let records = unsafe { std::slice::from_raw_parts(arr, count) };
    // SAFETY: Forwarded to the caller.
    Ok(unsafe { unpack_slice(records) })
}

/// Decode named wire records into a map. Later duplicates overwrite earlier ones.
///
/// Records whose name pointer is null with a nonzero length are skipped.
///
/// # Safety
/// Every name and text pointer in `records` must be readable for its length.
pub unsafe fn unpack_named_slice(records: &[NamedExtensionParameterPod]) -> ParamMap {
    let mut params = ParamMap::new();
    for record in records {
        // SAFETY: Forwarded to the caller.
        let Some(name) = (unsafe { WireStr::from_wire(record.name) }) else {
            warn!(len = record.name.len, "named parameter has a null name pointer, skipping");
            continue;
        };
        // SAFETY: Forwarded to the caller.
        let value = unsafe { unpack_parameter(&record.value) };
        params.insert(name.into_owned(), value);
    }
    params
}

/// Decode `count` named records starting at `arr`.
///
/// # Safety
/// If `count > 0`, `arr` must be null or readable for `count` records, each
/// satisfying [`unpack_named_slice`]'s contract.
pub unsafe fn unpack_named_array(
    count: usize,
    arr: *const NamedExtensionParameterPod,
) -> Result<ParamMap> {
    if count == 0 {
        return Ok(ParamMap::new());
    }
    if arr.is_null() {
        return Err(ParamError::NullArray { count });
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    let records = unsafe { std::slice::from_raw_parts(arr, count) };
    // SAFETY: Forwarded to the caller.
    Ok(unsafe { unpack_named_slice(records) })
}

/// Owned copies of the text referenced by packed records.
///
/// Each buffer is a separate heap allocation, so pushing more buffers never
/// moves the bytes an earlier [`WireText`] points at.
#[derive(Default)]
struct TextArena {
    buffers: Vec<Box<[u8]>>,
}

impl TextArena {
    fn stage(&mut self, text: &str) -> WireText {
        if text.is_empty() {
            return WireText::EMPTY;
        }
        let buffer: Box<[u8]> = text.as_bytes().into();
        let wire = WireText::describe(&buffer);
        self.buffers.push(buffer);
        wire
    }

    fn stage_value(&mut self, value: &ExtensionParameter) -> ExtensionParameterPod {
        match value {
            ExtensionParameter::Null => ExtensionParameterPod::null(),
            ExtensionParameter::Boolean(value) => ExtensionParameterPod::boolean(*value),
            ExtensionParameter::Number(value) => ExtensionParameterPod::number(*value),
            ExtensionParameter::Text(value) => ExtensionParameterPod::text(self.stage(value)),
        }
    }
}

/// Named wire records plus the storage their text pointers refer to.
///
/// The records are only reachable by borrowing this buffer, so they cannot be
/// handed across the boundary after the storage is gone.
pub struct PackedParams {
    records: Vec<NamedExtensionParameterPod>,
    _text: TextArena,
}

impl PackedParams {
    pub fn as_slice(&self) -> &[NamedExtensionParameterPod] {
        &self.records
    }

    /// Pointer to the first record, or null when empty.
    pub fn as_ptr(&self) -> *const NamedExtensionParameterPod {
        if self.records.is_empty() {
            std::ptr::null()
        } else {
            self.records.as_ptr()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Positional wire records plus the storage their text pointers refer to.
pub struct PackedArray {
    records: Vec<ExtensionParameterPod>,
    _text: TextArena,
}

impl PackedArray {
    pub fn as_slice(&self) -> &[ExtensionParameterPod] {
        &self.records
    }

    /// Pointer to the first record, or null when empty.
    pub fn as_ptr(&self) -> *const ExtensionParameterPod {
        if self.records.is_empty() {
            std::ptr::null()
        } else {
            self.records.as_ptr()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Encode named parameters, copying every name and text value.
///
/// Records follow the map's key order.
pub fn pack_named(params: &ParamMap) -> PackedParams {
    let mut text = TextArena::default();
    let records = params
        .iter()
        .map(|(name, value)| NamedExtensionParameterPod {
            name: text.stage(name),
            value: text.stage_value(value),
        })
        .collect();

    PackedParams {
        records,
        _text: text,
    }
}

/// Encode positional parameters, copying every text value.
pub fn pack_array(params: &[ExtensionParameter]) -> PackedArray {
    let mut text = TextArena::default();
    let records = params.iter().map(|value| text.stage_value(value)).collect();

    PackedArray {
        records,
        _text: text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{PARAM_BOOLEAN, PARAM_NULL, PARAM_NUMBER, PARAM_TEXT};

    fn sample_map() -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("enabled".into(), true.into());
        params.insert("ratio".into(), 0.1_f64.into());
        params.insert("label".into(), "héllo wörld".into());
        params.insert("missing".into(), ExtensionParameter::Null);
        params.insert("empty".into(), "".into());
        params
    }

    #[test]
    fn unpack_preserves_length_order_and_variants() {
        let text = "abc";
        let records = [
            ExtensionParameterPod::number(1.5),
            ExtensionParameterPod::null(),
            ExtensionParameterPod::text(WireText::describe(text.as_bytes())),
            ExtensionParameterPod::boolean(false),
        ];

        // SAFETY: `records` and `text` are alive for the call.
        let values = unsafe { unpack_array(records.len(), records.as_ptr()) }.unwrap();

        assert_eq!(
            values,
            vec![
                ExtensionParameter::Number(1.5),
                ExtensionParameter::Null,
                ExtensionParameter::Text("abc".to_string()),
                ExtensionParameter::Boolean(false),
            ]
        );
    }

    #[test]
    fn zero_count_unpacks_to_empty() {
        // SAFETY: A zero count never reads the pointer.
        let values = unsafe { unpack_array(0, std::ptr::null()) }.unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn null_array_with_count_is_rejected() {
        // SAFETY: A null array is rejected before any read.
        let err = unsafe { unpack_array(2, std::ptr::null()) }.unwrap_err();
        assert!(matches!(err, ParamError::NullArray { count: 2 }));
    }

    #[test]
    fn unknown_discriminant_fails_soft() {
        let records = [
            ExtensionParameterPod::boolean(true),
            ExtensionParameterPod::with_raw_kind(0x7F),
            ExtensionParameterPod::number(-2.0),
        ];

        // SAFETY: No text records.
        let values = unsafe { unpack_slice(&records) };

        assert_eq!(values.len(), 3);
        assert_eq!(values[0], ExtensionParameter::Boolean(true));
        assert_eq!(values[1], ExtensionParameter::Null);
        assert_eq!(values[2], ExtensionParameter::Number(-2.0));
    }

    #[test]
    fn null_text_pointer_fails_soft() {
        let records = [ExtensionParameterPod::text(WireText {
            ptr: std::ptr::null(),
            len: 8,
        })];

        // SAFETY: The null pointer is rejected before any read.
        let values = unsafe { unpack_slice(&records) };
        assert_eq!(values, vec![ExtensionParameter::Null]);
    }

    #[test]
    fn nonzero_boolean_byte_is_true() {
        let mut pod = ExtensionParameterPod::boolean(false);
        pod.payload.boolean = 2;
        // SAFETY: No text records.
        let value = unsafe { unpack_parameter(&pod) };
        assert_eq!(value, ExtensionParameter::Boolean(true));
    }

    #[test]
    fn pack_named_follows_key_order() {
        let packed = pack_named(&sample_map());
        assert_eq!(packed.len(), 5);

        // SAFETY: `packed` owns the names for the duration of the borrow.
        let names: Vec<String> = packed
            .as_slice()
            .iter()
            .map(|record| unsafe { WireStr::from_wire(record.name) }.unwrap().into_owned())
            .collect();
        assert_eq!(names, ["empty", "enabled", "label", "missing", "ratio"]);
    }

    #[test]
    fn pack_named_discriminants_match_values() {
        let packed = pack_named(&sample_map());
        let kinds: Vec<u8> = packed.as_slice().iter().map(|r| r.value.kind).collect();
        assert_eq!(
            kinds,
            [PARAM_TEXT, PARAM_BOOLEAN, PARAM_TEXT, PARAM_NULL, PARAM_NUMBER]
        );
    }

    #[test]
    fn packed_values_are_bit_exact() {
        let mut params = ParamMap::new();
        params.insert("tiny".into(), f64::MIN_POSITIVE.into());
        params.insert("negzero".into(), (-0.0_f64).into());
        params.insert("big".into(), 1e308_f64.into());
        params.insert("no".into(), false.into());

        let packed = pack_named(&params);
        // SAFETY: `packed` is alive for the call.
        let back = unsafe { unpack_named_slice(packed.as_slice()) };

        for (name, original) in &params {
            let decoded = &back[name];
            match (original, decoded) {
                (ExtensionParameter::Number(a), ExtensionParameter::Number(b)) => {
                    assert_eq!(a.to_bits(), b.to_bits(), "{name}");
                }
                _ => assert_eq!(original, decoded, "{name}"),
            }
        }
    }

    #[test]
    fn text_survives_after_source_is_dropped() {
        let packed = {
            let mut params = ParamMap::new();
            params.insert("greeting".into(), "x".repeat(4096).into());
            params.insert("emoji".into(), "🦀 crab".into());
            pack_named(&params)
            // `params` is dropped here.
        };

        // SAFETY: `packed` owns every name and text buffer.
        let back = unsafe { unpack_named_slice(packed.as_slice()) };
        assert_eq!(back["greeting"].as_str().unwrap().len(), 4096);
        assert_eq!(back["emoji"].as_str(), Some("🦀 crab"));
    }

    #[test]
    fn empty_pack_uses_null_pointer() {
        let packed = pack_named(&ParamMap::new());
        assert!(packed.is_empty());
        assert!(packed.as_ptr().is_null());

        // SAFETY: A zero count never reads the pointer.
        let back = unsafe { unpack_named_array(packed.len(), packed.as_ptr()) }.unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn duplicate_names_keep_last_value() {
        let first = "dup";
        let records = [
            NamedExtensionParameterPod {
                name: WireText::describe(first.as_bytes()),
                value: ExtensionParameterPod::number(1.0),
            },
            NamedExtensionParameterPod {
                name: WireText::describe(first.as_bytes()),
                value: ExtensionParameterPod::number(2.0),
            },
        ];

        // SAFETY: `records` and `first` are alive for the call.
        let map = unsafe { unpack_named_array(records.len(), records.as_ptr()) }.unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["dup"], ExtensionParameter::Number(2.0));
    }

    #[test]
    fn pack_array_preserves_order() {
        let values = vec![
            ExtensionParameter::Text("first".into()),
            ExtensionParameter::Null,
            ExtensionParameter::Number(42.0),
        ];
        let packed = pack_array(&values);

        // SAFETY: `packed` is alive for the call.
        let back = unsafe { unpack_array(packed.len(), packed.as_ptr()) }.unwrap();
        assert_eq!(back, values);
    }
}
