//! Marker rules influencing field metadata: required, required_if,
//! nullable, array, object.

use super::{Marker, Rule};
use crate::engine::context::Context;
use crate::value::homogenize::homogenize;
use crate::value::Value;

/// The field must be present and non-nil.
pub fn required() -> Box<dyn Rule> {
    Box::new(Required)
}

struct Required;

impl Rule for Required {
    fn name(&self) -> &'static str {
        "required"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        !ctx.value.is_null()
    }

    fn marker(&self) -> Option<Marker> {
        Some(Marker::Required)
    }
}

/// The field must be present when `condition` holds.
pub fn required_if<F>(condition: F) -> Box<dyn Rule>
where
    F: Fn(&Context) -> bool + Send + Sync + 'static,
{
    Box::new(RequiredIf {
        condition: Box::new(condition),
    })
}

struct RequiredIf {
    condition: Box<dyn Fn(&Context) -> bool + Send + Sync>,
}

impl Rule for RequiredIf {
    // Failures surface as the plain `required` message.
    fn name(&self) -> &'static str {
        "required"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        if (self.condition)(ctx) {
            !ctx.value.is_null()
        } else {
            true
        }
    }

    fn marker(&self) -> Option<Marker> {
        Some(Marker::Required)
    }

    fn required_when(&self, ctx: &Context) -> bool {
        (self.condition)(ctx)
    }
}

/// Explicit nil values are kept in the tree and stop the rule loop.
pub fn nullable() -> Box<dyn Rule> {
    Box::new(Nullable)
}

struct Nullable;

impl Rule for Nullable {
    fn name(&self) -> &'static str {
        "nullable"
    }

    fn validate(&self, _ctx: &mut Context) -> bool {
        true
    }

    fn marker(&self) -> Option<Marker> {
        Some(Marker::Nullable)
    }
}

/// Type rule: the value must be an array. On success the elements are
/// homogenized when they share a kind.
pub fn array() -> Box<dyn Rule> {
    Box::new(ArrayType)
}

struct ArrayType;

impl Rule for ArrayType {
    fn name(&self) -> &'static str {
        "array"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match &mut ctx.value {
            Value::Array(items) => {
                homogenize(items);
                true
            }
            _ => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn marker(&self) -> Option<Marker> {
        Some(Marker::Array)
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("array")
    }
}

/// Type rule: the value must be an object.
pub fn object() -> Box<dyn Rule> {
    Box::new(ObjectType)
}

struct ObjectType;

impl Rule for ObjectType {
    fn name(&self) -> &'static str {
        "object"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        matches!(ctx.value, Value::Object(_))
    }

    fn is_type(&self) -> bool {
        true
    }

    fn marker(&self) -> Option<Marker> {
        Some(Marker::Object)
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("object")
    }
}
