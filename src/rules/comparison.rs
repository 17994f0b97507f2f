//! Size and comparison rules, shared by every sizable kind: strings are
//! measured in grapheme clusters, arrays in elements, objects in keys and
//! files in KiB buckets.

use super::{display_number, Rule};
use crate::engine::context::{Context, RuleError};
use crate::path::Path;
use crate::value::number::{number_as_f64, Coerced};
use crate::value::{FieldType, Value};
use unicode_segmentation::UnicodeSegmentation;

/// Apply `predicate` to the size of a sizable value. Non-sizable kinds
/// pass so comparator rules never falsely fail booleans or dates.
pub(crate) fn validate_size<F>(value: &Value, predicate: F) -> bool
where
    F: Fn(f64) -> bool,
{
    match value {
        Value::String(s) => predicate(s.graphemes(true).count() as f64),
        Value::Array(items) => predicate(items.len() as f64),
        Value::Object(map) => predicate(map.len() as f64),
        Value::Files(files) => files.iter().all(|f| predicate(f.size_kib() as f64)),
        _ => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Min,
    Max,
}

/// The value must be at least `min` (numeric value or size).
pub fn min(min: f64) -> Box<dyn Rule> {
    Box::new(MinMax {
        name: "min",
        bound: Bound::Min,
        limit: min,
    })
}

/// The value must not exceed `max` (numeric value or size).
pub fn max(max: f64) -> Box<dyn Rule> {
    Box::new(MinMax {
        name: "max",
        bound: Bound::Max,
        limit: max,
    })
}

struct MinMax {
    name: &'static str,
    bound: Bound,
    limit: f64,
}

impl MinMax {
    fn holds(&self, measured: f64) -> bool {
        match self.bound {
            Bound::Min => measured >= self.limit,
            Bound::Max => measured <= self.limit,
        }
    }
}

impl Rule for MinMax {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match number_as_f64(&ctx.value) {
            Coerced::Num(n) => self.holds(n),
            Coerced::Overflow => false,
            Coerced::NotNumeric => validate_size(&ctx.value, |size| self.holds(size)),
        }
    }

    fn is_type_dependent(&self) -> bool {
        true
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        let key = match self.bound {
            Bound::Min => ":min",
            Bound::Max => ":max",
        };
        vec![(key.to_string(), display_number(self.limit))]
    }
}

/// The value must lie in `[min, max]` (numeric value or size).
pub fn between(min: f64, max: f64) -> Box<dyn Rule> {
    Box::new(Between { min, max })
}

struct Between {
    min: f64,
    max: f64,
}

impl Rule for Between {
    fn name(&self) -> &'static str {
        "between"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let inside = |n: f64| n >= self.min && n <= self.max;
        match number_as_f64(&ctx.value) {
            Coerced::Num(n) => inside(n),
            Coerced::Overflow => false,
            Coerced::NotNumeric => validate_size(&ctx.value, inside),
        }
    }

    fn is_type_dependent(&self) -> bool {
        true
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        vec![
            (":min".to_string(), display_number(self.min)),
            (":max".to_string(), display_number(self.max)),
        ]
    }
}

/// The value must have exactly `size` units (characters, items, keys or
/// KiB). Numbers are not sizable and pass.
pub fn size(size: usize) -> Box<dyn Rule> {
    Box::new(Size { size })
}

struct Size {
    size: usize,
}

impl Rule for Size {
    fn name(&self) -> &'static str {
        "size"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        validate_size(&ctx.value, |measured| measured == self.size as f64)
    }

    fn is_type_dependent(&self) -> bool {
        true
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        vec![(":value".to_string(), self.size.to_string())]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ordering {
    Greater,
    GreaterEqual,
    Lower,
    LowerEqual,
}

/// The value must compare greater than the value at `other`.
pub fn greater_than(other: &str) -> Box<dyn Rule> {
    field_comparison("greater_than", Ordering::Greater, other)
}

pub fn greater_than_equal(other: &str) -> Box<dyn Rule> {
    field_comparison("greater_than_equal", Ordering::GreaterEqual, other)
}

/// The value must compare lower than the value at `other`.
pub fn lower_than(other: &str) -> Box<dyn Rule> {
    field_comparison("lower_than", Ordering::Lower, other)
}

pub fn lower_than_equal(other: &str) -> Box<dyn Rule> {
    field_comparison("lower_than_equal", Ordering::LowerEqual, other)
}

fn field_comparison(name: &'static str, ordering: Ordering, other: &str) -> Box<dyn Rule> {
    Box::new(FieldComparison {
        name,
        ordering,
        other: other.to_string(),
    })
}

struct FieldComparison {
    name: &'static str,
    ordering: Ordering,
    other: String,
}

/// Comparable measure of a value: numbers by value, everything sizable by
/// its size.
fn measure(value: &Value) -> Option<f64> {
    match number_as_f64(value) {
        Coerced::Num(n) => Some(n),
        Coerced::Overflow => None,
        Coerced::NotNumeric => match value {
            Value::String(s) => Some(s.graphemes(true).count() as f64),
            Value::Array(items) => Some(items.len() as f64),
            Value::Object(map) => Some(map.len() as f64),
            Value::Files(files) => files.iter().map(|f| f.size_kib() as f64).reduce(f64::max),
            _ => None,
        },
    }
}

impl Rule for FieldComparison {
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
        let Some(other) = path.first(ctx.data) else {
            return false;
        };
        if FieldType::of(&ctx.value) != FieldType::of(other) {
            return false;
        }
        let (Some(own), Some(them)) = (measure(&ctx.value), measure(other)) else {
            return false;
        };
        match self.ordering {
            Ordering::Greater => own > them,
            Ordering::GreaterEqual => own >= them,
            Ordering::Lower => own < them,
            Ordering::LowerEqual => own <= them,
        }
    }

    fn is_type_dependent(&self) -> bool {
        true
    }

    fn message_placeholders(&self, ctx: &Context) -> Vec<(String, String)> {
        vec![(":other".to_string(), other_display(&self.other, ctx))]
    }

    fn referenced_fields(&self) -> Vec<String> {
        vec![self.other.clone()]
    }
}

pub(crate) fn other_display(other: &str, ctx: &Context) -> String {
    Path::parse(other)
        .ok()
        .and_then(|p| p.last_name().map(|n| ctx.language.field_name(n).to_string()))
        .unwrap_or_else(|| other.to_string())
}

/// The value must deep-equal the value at `other`.
pub fn same(other: &str) -> Box<dyn Rule> {
    Box::new(Equality {
        name: "same",
        other: other.to_string(),
        negate: false,
    })
}

/// The value must differ from the value at `other`.
pub fn different(other: &str) -> Box<dyn Rule> {
    Box::new(Equality {
        name: "different",
        other: other.to_string(),
        negate: true,
    })
}

struct Equality {
    name: &'static str,
    other: String,
    negate: bool,
}

impl Rule for Equality {
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
        let equal = path.first(ctx.data) == Some(&ctx.value);
        equal != self.negate
    }

    fn message_placeholders(&self, ctx: &Context) -> Vec<(String, String)> {
        vec![(":other".to_string(), other_display(&self.other, ctx))]
    }

    fn referenced_fields(&self) -> Vec<String> {
        vec![self.other.clone()]
    }
}

/// The field must hold exactly `count` files.
pub fn count(count: usize) -> Box<dyn Rule> {
    Box::new(FileCount {
        name: "count",
        min: count,
        max: count,
        placeholder: CountPlaceholder::Exact,
    })
}

/// The field must hold at least `min` files.
pub fn count_min(min: usize) -> Box<dyn Rule> {
    Box::new(FileCount {
        name: "count_min",
        min,
        max: usize::MAX,
        placeholder: CountPlaceholder::Min,
    })
}

/// The field must hold at most `max` files.
pub fn count_max(max: usize) -> Box<dyn Rule> {
    Box::new(FileCount {
        name: "count_max",
        min: 0,
        max,
        placeholder: CountPlaceholder::Max,
    })
}

/// The field must hold between `min` and `max` files.
pub fn count_between(min: usize, max: usize) -> Box<dyn Rule> {
    Box::new(FileCount {
        name: "count_between",
        min,
        max,
        placeholder: CountPlaceholder::Both,
    })
}

enum CountPlaceholder {
    Exact,
    Min,
    Max,
    Both,
}

struct FileCount {
    name: &'static str,
    min: usize,
    max: usize,
    placeholder: CountPlaceholder,
}

impl Rule for FileCount {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match ctx.value.as_files() {
            Some(files) => files.len() >= self.min && files.len() <= self.max,
            None => false,
        }
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        match self.placeholder {
            CountPlaceholder::Exact => vec![(":value".to_string(), self.min.to_string())],
            CountPlaceholder::Min => vec![(":min".to_string(), self.min.to_string())],
            CountPlaceholder::Max => vec![(":max".to_string(), self.max.to_string())],
            CountPlaceholder::Both => vec![
                (":min".to_string(), self.min.to_string()),
                (":max".to_string(), self.max.to_string()),
            ],
        }
    }
}
