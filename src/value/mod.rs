//! Tagged value tree manipulated by the validation engine.
//!
//! Input documents enter as `serde_json::Value` and are converted into
//! [`Value`], which can additionally carry the typed scalars produced by
//! type rules (dates, UUIDs, IP addresses, URLs, timezones, files). Objects
//! preserve insertion order.

pub mod field_type;
pub mod homogenize;
pub mod number;

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::Serialize;
use std::net::IpAddr;
use url::Url;
use uuid::Uuid;

pub use field_type::FieldType;

/// An uploaded file reference. Multipart decoding happens upstream; the
/// engine only inspects the recorded metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Size in bytes.
    pub size: u64,
}

impl File {
    pub fn new(name: impl Into<String>, content_type: Option<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            content_type,
            size,
        }
    }

    /// Size bucket used by size-family rules: ceil(bytes / 1 KiB).
    pub fn size_kib(&self) -> u64 {
        self.size.div_ceil(1024)
    }
}

/// A node of the input tree.
///
/// `Null`, `Bool`, numbers, `String`, `Array` and `Object` mirror the JSON
/// data model. The remaining variants are produced by type rules rewriting
/// a value in place (e.g. `date` turning a string into [`Value::Date`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Date(NaiveDateTime),
    Uuid(Uuid),
    Ip(IpAddr),
    Url(Url),
    Timezone(Tz),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Files(Vec<File>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_files(&self) -> Option<&Vec<File>> {
        match self {
            Value::Files(files) => Some(files),
            _ => None,
        }
    }

    /// Convert a decoded JSON document into an engine value.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render the tree back to JSON. Typed scalars serialize to their
    /// canonical textual forms.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::UInt(u) => serde_json::Value::from(*u),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => {
                serde_json::Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            Value::Uuid(u) => serde_json::Value::String(u.to_string()),
            Value::Ip(ip) => serde_json::Value::String(ip.to_string()),
            Value::Url(u) => serde_json::Value::String(u.to_string()),
            Value::Timezone(tz) => serde_json::Value::String(tz.name().to_string()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Files(files) => serde_json::Value::Array(
                files
                    .iter()
                    .map(|f| serde_json::to_value(f).unwrap_or(serde_json::Value::Null))
                    .collect(),
            ),
        }
    }

    /// Human-readable rendering used by message placeholders such as
    /// `:other` and `:values`.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            Value::String(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Uuid(u) => u.to_string(),
            Value::Ip(ip) => ip.to_string(),
            Value::Url(u) => u.to_string(),
            Value::Timezone(tz) => tz.name().to_string(),
            Value::Array(items) => items
                .iter()
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Object(_) => "object".to_string(),
            Value::Files(files) => files
                .iter()
                .map(|f| f.name.clone())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(json)
    }
}
