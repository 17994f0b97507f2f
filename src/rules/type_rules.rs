//! Scalar type rules. On success the value is rebound to its normalized
//! representation (numeric strings parsed, JSON decoded, ...).

use super::Rule;
use crate::engine::context::Context;
use crate::value::number::{fits_f32, int_fits, is_integral, uint_fits};
use crate::value::Value;

/// Type rule: the value must be a string.
pub fn string() -> Box<dyn Rule> {
    Box::new(StringType)
}

struct StringType;

impl Rule for StringType {
    fn name(&self) -> &'static str {
        "string"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        matches!(ctx.value, Value::String(_))
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("string")
    }
}

/// Type rule: the value must be (or convert to) a boolean. Accepts the
/// usual textual and 0/1 spellings.
pub fn boolean() -> Box<dyn Rule> {
    Box::new(BoolType)
}

struct BoolType;

impl Rule for BoolType {
    fn name(&self) -> &'static str {
        "bool"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let converted = match &ctx.value {
            Value::Bool(_) => return true,
            Value::Int(0) | Value::UInt(0) => Some(false),
            Value::Int(1) | Value::UInt(1) => Some(true),
            Value::String(s) => match s.as_str() {
                "1" | "on" | "true" | "yes" => Some(true),
                "0" | "off" | "false" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        };
        match converted {
            Some(b) => {
                ctx.value = Value::Bool(b);
                true
            }
            None => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("bool")
    }
}

macro_rules! signed_int_rule {
    ($fn_name:ident, $rule_name:literal, $bits:expr) => {
        #[doc = concat!("Type rule: an integer fitting ", $rule_name, ".")]
        pub fn $fn_name() -> Box<dyn Rule> {
            Box::new(SignedInt {
                name: $rule_name,
                bits: $bits,
            })
        }
    };
}

signed_int_rule!(int, "int", 64);
signed_int_rule!(int8, "int8", 8);
signed_int_rule!(int16, "int16", 16);
signed_int_rule!(int32, "int32", 32);
signed_int_rule!(int64, "int64", 64);

struct SignedInt {
    name: &'static str,
    bits: u32,
}

impl Rule for SignedInt {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let converted = match &ctx.value {
            Value::Int(i) => int_fits(*i, self.bits).then_some(*i),
            Value::UInt(u) => i64::try_from(*u)
                .ok()
                .filter(|i| int_fits(*i, self.bits)),
            Value::Float(f) => {
                if is_integral(*f) && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    let i = *f as i64;
                    int_fits(i, self.bits).then_some(i)
                } else {
                    None
                }
            }
            Value::String(s) => s.parse::<i64>().ok().filter(|i| int_fits(*i, self.bits)),
            _ => None,
        };
        match converted {
            Some(i) => {
                ctx.value = Value::Int(i);
                true
            }
            None => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("numeric")
    }
}

macro_rules! unsigned_int_rule {
    ($fn_name:ident, $rule_name:literal, $bits:expr) => {
        #[doc = concat!("Type rule: a positive integer fitting ", $rule_name, ".")]
        pub fn $fn_name() -> Box<dyn Rule> {
            Box::new(UnsignedInt {
                name: $rule_name,
                bits: $bits,
            })
        }
    };
}

unsigned_int_rule!(uint, "uint", 64);
unsigned_int_rule!(uint8, "uint8", 8);
unsigned_int_rule!(uint16, "uint16", 16);
unsigned_int_rule!(uint32, "uint32", 32);
unsigned_int_rule!(uint64, "uint64", 64);

struct UnsignedInt {
    name: &'static str,
    bits: u32,
}

impl Rule for UnsignedInt {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let converted = match &ctx.value {
            Value::UInt(u) => uint_fits(*u, self.bits).then_some(*u),
            Value::Int(i) => u64::try_from(*i)
                .ok()
                .filter(|u| uint_fits(*u, self.bits)),
            Value::Float(f) => {
                if is_integral(*f) && *f >= 0.0 && *f <= u64::MAX as f64 {
                    let u = *f as u64;
                    uint_fits(u, self.bits).then_some(u)
                } else {
                    None
                }
            }
            Value::String(s) => s.parse::<u64>().ok().filter(|u| uint_fits(*u, self.bits)),
            _ => None,
        };
        match converted {
            Some(u) => {
                ctx.value = Value::UInt(u);
                true
            }
            None => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("numeric")
    }
}

/// Type rule: a 32-bit float.
pub fn float32() -> Box<dyn Rule> {
    Box::new(FloatType {
        name: "float32",
        narrow: true,
    })
}

/// Type rule: a 64-bit float.
pub fn float64() -> Box<dyn Rule> {
    Box::new(FloatType {
        name: "float64",
        narrow: false,
    })
}

/// Alias of [`float64`] under the `numeric` name.
pub fn numeric() -> Box<dyn Rule> {
    Box::new(FloatType {
        name: "numeric",
        narrow: false,
    })
}

struct FloatType {
    name: &'static str,
    narrow: bool,
}

impl Rule for FloatType {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let converted = match &ctx.value {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            Value::String(s) => s.parse::<f64>().ok(),
            _ => None,
        };
        match converted {
            Some(f) if !self.narrow || fits_f32(f) => {
                let stored = if self.narrow { f as f32 as f64 } else { f };
                ctx.value = Value::Float(stored);
                true
            }
            _ => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("numeric")
    }
}

/// Type rule: a string containing valid JSON; the value is replaced by
/// the decoded tree.
pub fn json() -> Box<dyn Rule> {
    Box::new(JsonType)
}

struct JsonType;

impl Rule for JsonType {
    fn name(&self) -> &'static str {
        "json"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let Value::String(raw) = &ctx.value else {
            return false;
        };
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(decoded) => {
                ctx.value = Value::from_json(decoded);
                true
            }
            Err(_) => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("json")
    }
}
