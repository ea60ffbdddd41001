use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParamError, Result};
use crate::wire::ParamType;

/// Named parameters keyed by name. Iteration order is the key order.
pub type ParamMap = BTreeMap<String, ExtensionParameter>;

/// One dynamically typed parameter value.
///
/// Serializes as a bare JSON scalar: `null`, a boolean, a number, or a string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionParameter {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl ExtensionParameter {
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Null => ParamType::Null,
            Self::Boolean(_) => ParamType::Boolean,
            Self::Number(_) => ParamType::Number,
            Self::Text(_) => ParamType::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ExtensionParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for ExtensionParameter {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for ExtensionParameter {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ExtensionParameter {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ExtensionParameter {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<ExtensionParameter>> From<Option<T>> for ExtensionParameter {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for ExtensionParameter {
    type Error = ParamError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(value) => Ok(Self::Boolean(value)),
            serde_json::Value::Number(number) => number
                .as_f64()
                .map(Self::Number)
                .ok_or(ParamError::UnsupportedJson { kind: "number" }),
            serde_json::Value::String(value) => Ok(Self::Text(value)),
            serde_json::Value::Array(_) => Err(ParamError::UnsupportedJson { kind: "array" }),
            serde_json::Value::Object(_) => Err(ParamError::UnsupportedJson { kind: "object" }),
        }
    }
}

impl From<ExtensionParameter> for serde_json::Value {
    fn from(value: ExtensionParameter) -> Self {
        match value {
            ExtensionParameter::Null => serde_json::Value::Null,
            ExtensionParameter::Boolean(value) => serde_json::Value::Bool(value),
            // Non-finite numbers have no JSON form.
            ExtensionParameter::Number(value) => serde_json::Number::from_f64(value)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            ExtensionParameter::Text(value) => serde_json::Value::String(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_scalars_convert() {
        let cases = [
            (serde_json::json!(null), ExtensionParameter::Null),
            (serde_json::json!(true), ExtensionParameter::Boolean(true)),
            (serde_json::json!(3), ExtensionParameter::Number(3.0)),
            (serde_json::json!(-0.5), ExtensionParameter::Number(-0.5)),
            (
                serde_json::json!("hi"),
                ExtensionParameter::Text("hi".to_string()),
            ),
        ];
        for (json, expected) in cases {
            assert_eq!(ExtensionParameter::try_from(json).unwrap(), expected);
        }
    }

    #[test]
    fn json_containers_are_rejected() {
        let err = ExtensionParameter::try_from(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, ParamError::UnsupportedJson { kind: "array" }));

        let err = ExtensionParameter::try_from(serde_json::json!({"a": 1})).unwrap_err();
        assert!(matches!(err, ParamError::UnsupportedJson { kind: "object" }));
    }

    #[test]
    fn serde_uses_bare_scalars() {
        let mut map = ParamMap::new();
        map.insert("flag".into(), true.into());
        map.insert("none".into(), ExtensionParameter::Null);
        map.insert("result".into(), "success".into());

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"flag":true,"none":null,"result":"success"}"#);

        let back: ParamMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn non_finite_number_becomes_json_null() {
        let json = serde_json::Value::from(ExtensionParameter::Number(f64::NAN));
        assert!(json.is_null());
    }

    #[test]
    fn no_implicit_coercion() {
        let value = ExtensionParameter::from("1");
        assert_eq!(value.as_number(), None);
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_str(), Some("1"));
    }
}
