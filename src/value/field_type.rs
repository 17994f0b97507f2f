use super::Value;

/// Runtime kind of a value, as observed by type-dependent rules and
/// message-key suffixing. All integer and float widths collapse to
/// `Numeric`; typed scalars produced by conversion rules (dates, UUIDs,
/// IPs, ...) are not re-classifiable and report `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Numeric,
    String,
    Bool,
    Array,
    Object,
    File,
    Unsupported,
}

impl FieldType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Int(_) | Value::UInt(_) | Value::Float(_) => FieldType::Numeric,
            Value::String(_) => FieldType::String,
            Value::Bool(_) => FieldType::Bool,
            Value::Array(_) => FieldType::Array,
            Value::Object(_) => FieldType::Object,
            Value::Files(_) => FieldType::File,
            _ => FieldType::Unsupported,
        }
    }

    /// Message-key suffix segment for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Numeric => "numeric",
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::File => "file",
            FieldType::Unsupported => "unsupported",
        }
    }
}
