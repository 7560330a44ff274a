//! Parameter value tree.
//!
//! Mirrors the value model of a parameter server: scalars, timestamps, raw
//! bytes, ordered arrays and string-keyed structs. The serde representation
//! is externally tagged so every node carries its own type and a value
//! survives a JSON round trip unchanged (including `Int` vs `Double` and
//! non-finite doubles).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::EncodeError;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Double(#[serde(with = "double_repr")] f64),
    String(String),
    #[serde(rename = "datetime")]
    DateTime(DateTime<Utc>),
    Binary(#[serde(with = "binary_repr")] Vec<u8>),
    Array(Vec<ParamValue>),
    /// Members are kept sorted so equal structs always serialize identically.
    Struct(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Short type name, used in logs and CLI output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::DateTime(_) => "datetime",
            Self::Binary(_) => "binary",
            Self::Array(_) => "array",
            Self::Struct(_) => "struct",
        }
    }

    /// Convert an untyped JSON document into a parameter value.
    ///
    /// Integers that fit in 32 bits become `Int`, every other number becomes
    /// `Double`. `null` has no parameter equivalent and is rejected.
    pub fn from_json(value: serde_json::Value) -> Result<Self, EncodeError> {
        Self::from_json_at(value, "")
    }

    fn from_json_at(value: serde_json::Value, path: &str) -> Result<Self, EncodeError> {
        use serde_json::Value;

        match value {
            Value::Null => Err(EncodeError::UnsupportedJson {
                path: if path.is_empty() { "/".to_string() } else { path.to_string() },
                message: "null is not a parameter value".to_string(),
            }),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64().and_then(|i| i32::try_from(i).ok()) {
                    return Ok(Self::Int(i));
                }
                n.as_f64().map(Self::Double).ok_or_else(|| EncodeError::UnsupportedJson {
                    path: path.to_string(),
                    message: format!("number {} is not representable", n),
                })
            }
            Value::String(s) => Ok(Self::String(s)),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| Self::from_json_at(item, &format!("{}/{}", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Array),
            Value::Object(members) => members
                .into_iter()
                .map(|(k, v)| {
                    let child = format!("{}/{}", path, k);
                    Self::from_json_at(v, &child).map(|v| (k, v))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Self::Struct),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(v: Vec<ParamValue>) -> Self {
        Self::Array(v)
    }
}

impl From<BTreeMap<String, ParamValue>> for ParamValue {
    fn from(v: BTreeMap<String, ParamValue>) -> Self {
        Self::Struct(v)
    }
}

/// JSON numbers cannot carry NaN or infinities, so those travel as strings.
mod double_repr {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const NAN: &str = "NaN";
    const POS_INF: &str = "inf";
    const NEG_INF: &str = "-inf";

    pub fn serialize<S>(v: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if v.is_finite() {
            serializer.serialize_f64(*v)
        } else if v.is_nan() {
            serializer.serialize_str(NAN)
        } else if v.is_sign_positive() {
            serializer.serialize_str(POS_INF)
        } else {
            serializer.serialize_str(NEG_INF)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(t) => match t.as_str() {
                NAN => Ok(f64::NAN),
                POS_INF => Ok(f64::INFINITY),
                NEG_INF => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid double literal {:?}", other))),
            },
        }
    }
}

mod binary_repr {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text.as_bytes()).map_err(D::Error::custom)
    }
}
