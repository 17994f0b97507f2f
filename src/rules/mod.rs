//! Rule catalog: the validator contract and the built-in rules.
//!
//! Rules are created through typed constructor functions (`required()`,
//! `min(3.0)`, `is_in(values)`, ...) and boxed into a [`List`]. A rule
//! checks one property of one value and may rewrite it on success; type
//! rules additionally declare the expected kind of the field.

pub mod array_ops;
pub mod comparison;
pub mod database;
pub mod date_ops;
pub mod file_ops;
pub mod markers;
pub mod string_ops;
pub mod type_rules;
pub mod net_ops;

use crate::engine::context::Context;
use crate::ruleset::CompileError;

pub use array_ops::{distinct, in_field, is_in, keys_in, not_in, not_in_field};
pub use comparison::{
    between, count, count_between, count_max, count_min, different, greater_than,
    greater_than_equal, lower_than, lower_than_equal, max, min, same, size,
};
pub use database::{exists, unique, Database};
pub use date_ops::{
    after, after_equal, before, before_equal, date, date_after_now, date_before_now, date_between,
    date_equals, date_with_formats,
};
pub use file_ops::{extension, file, image, mime};
pub use markers::{array, nullable, object, required, required_if};
pub use string_ops::{
    alpha, alpha_dash, alpha_num, digits, doesnt_end_with, doesnt_start_with, email, ends_with,
    regex, starts_with, trim,
};
pub use type_rules::{
    boolean, float32, float64, int, int16, int32, int64, int8, json, numeric, string, uint,
    uint16, uint32, uint64, uint8,
};
pub use net_ops::{ip, ipv4, ipv6, timezone, url, uuid, uuid_versions};

/// Marker classification observed by the engine when compiling a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Required,
    Nullable,
    Array,
    Object,
}

/// The validator contract. Implementations must be stateless across runs
/// and deterministic for a given context.
pub trait Rule: Send + Sync {
    /// Stable identifier indexing the language entries
    /// (`validation.rules.<name>`).
    fn name(&self) -> &'static str;

    /// Check the focused value; may rebind `ctx.value` on success or
    /// report operational errors through `ctx.add_error`.
    fn validate(&self, ctx: &mut Context) -> bool;

    /// True for type rules: they gate admissibility and may convert the
    /// value. At most one per field.
    fn is_type(&self) -> bool {
        false
    }

    /// True when the message template depends on the field's declared
    /// type (size and comparator families).
    fn is_type_dependent(&self) -> bool {
        false
    }

    /// `:name` → value pairs substituted into the message template.
    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Compile-time parameter check, run once when the rule set is
    /// compiled. Programmer errors fail fast here.
    fn check(&self) -> Result<(), CompileError> {
        Ok(())
    }

    /// Marker classification, when this rule influences field metadata.
    fn marker(&self) -> Option<Marker> {
        None
    }

    /// For Required-family markers: whether the field is required under
    /// this context.
    fn required_when(&self, _ctx: &Context) -> bool {
        true
    }

    /// Textual paths of other fields this rule compares against, relative
    /// to the rule set root. Drives compile-time ordering.
    fn referenced_fields(&self) -> Vec<String> {
        Vec::new()
    }

    /// Per-instance language key replacing the assembled one.
    fn message_key_override(&self) -> Option<&str> {
        None
    }

    /// Message-key suffix contributed when this is the field's type rule.
    /// Integer and float widths all map to `numeric`.
    fn expected_type(&self) -> Option<&'static str> {
        None
    }
}

/// Ordered validator list attached to one path.
pub type List = Vec<Box<dyn Rule>>;

/// Wrap a rule with a custom language entry key. Type-dependent and array
/// suffixes are not applied to overridden keys.
pub fn with_message(rule: Box<dyn Rule>, key: impl Into<String>) -> Box<dyn Rule> {
    Box::new(WithMessage {
        inner: rule,
        key: key.into(),
    })
}

struct WithMessage {
    inner: Box<dyn Rule>,
    key: String,
}

impl Rule for WithMessage {
    fn name(&self) -> &'static str {
        self.inner.name()
    }
    fn validate(&self, ctx: &mut Context) -> bool {
        self.inner.validate(ctx)
    }
    fn is_type(&self) -> bool {
        self.inner.is_type()
    }
    fn is_type_dependent(&self) -> bool {
        self.inner.is_type_dependent()
    }
    fn message_placeholders(&self, ctx: &Context) -> Vec<(String, String)> {
        self.inner.message_placeholders(ctx)
    }
    fn check(&self) -> Result<(), CompileError> {
        self.inner.check()
    }
    fn marker(&self) -> Option<Marker> {
        self.inner.marker()
    }
    fn required_when(&self, ctx: &Context) -> bool {
        self.inner.required_when(ctx)
    }
    fn referenced_fields(&self) -> Vec<String> {
        self.inner.referenced_fields()
    }
    fn message_key_override(&self) -> Option<&str> {
        Some(&self.key)
    }
    fn expected_type(&self) -> Option<&'static str> {
        self.inner.expected_type()
    }
}

/// Render a numeric rule parameter without a trailing `.0`.
pub(crate) fn display_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
