//! Membership and collection rules.

use super::comparison::other_display;
use super::Rule;
use crate::engine::context::{Context, RuleError};
use crate::path::Path;
use crate::value::Value;

/// The value must equal one of `values`.
pub fn is_in(values: Vec<Value>) -> Box<dyn Rule> {
    Box::new(OneOf {
        name: "in",
        values,
        negate: false,
    })
}

/// The value must not equal any of `values`.
pub fn not_in(values: Vec<Value>) -> Box<dyn Rule> {
    Box::new(OneOf {
        name: "not_in",
        values,
        negate: true,
    })
}

struct OneOf {
    name: &'static str,
    values: Vec<Value>,
    negate: bool,
}

impl Rule for OneOf {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let contained = self.values.contains(&ctx.value);
        contained != self.negate
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        let rendered = self
            .values
            .iter()
            .map(Value::to_display_string)
            .collect::<Vec<_>>()
            .join(", ");
        vec![(":values".to_string(), rendered)]
    }
}

/// The value must appear in the array at `other`.
pub fn in_field(other: &str) -> Box<dyn Rule> {
    Box::new(InField {
        name: "in_field",
        other: other.to_string(),
        negate: false,
    })
}

/// The value must not appear in the array at `other`.
pub fn not_in_field(other: &str) -> Box<dyn Rule> {
    Box::new(InField {
        name: "not_in_field",
        other: other.to_string(),
        negate: true,
    })
}

struct InField {
    name: &'static str,
    other: String,
    negate: bool,
}

impl Rule for InField {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let path = match Path::parse(&self.other) {
            Ok(path) => path,
            Err(err) => {
                ctx.add_error(RuleError::new(self.name, err.to_string()));
                return false;
            }
        };
        let contained = path
            .first(ctx.data)
            .and_then(Value::as_array)
            .is_some_and(|items| items.contains(&ctx.value));
        contained != self.negate
    }

    fn message_placeholders(&self, ctx: &Context) -> Vec<(String, String)> {
        vec![(":other".to_string(), other_display(&self.other, ctx))]
    }

    fn referenced_fields(&self) -> Vec<String> {
        vec![self.other.clone()]
    }
}

/// Every key of the object must be one of `keys`.
pub fn keys_in(keys: &[&str]) -> Box<dyn Rule> {
    Box::new(KeysIn {
        keys: keys.iter().map(|k| (*k).to_string()).collect(),
    })
}

struct KeysIn {
    keys: Vec<String>,
}

impl Rule for KeysIn {
    fn name(&self) -> &'static str {
        "keys_in"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match ctx.value.as_object() {
            Some(map) => map.keys().all(|k| self.keys.iter().any(|allowed| allowed == k)),
            None => false,
        }
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        vec![(":values".to_string(), self.keys.join(", "))]
    }
}

/// Array elements must be pairwise distinct.
pub fn distinct() -> Box<dyn Rule> {
    Box::new(Distinct)
}

struct Distinct;

impl Rule for Distinct {
    fn name(&self) -> &'static str {
        "distinct"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match ctx.value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if items[i + 1..].contains(item) {
                        return false;
                    }
                }
                true
            }
            None => false,
        }
    }
}
