//! Date type rule and the date comparator family.

use super::Rule;
use crate::engine::context::{Context, RuleError};
use crate::path::Path;
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};

const DEFAULT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.fZ", "%+"];

/// Parse a date string with fallback formats. Date-only formats resolve
/// to midnight.
fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDateTime> {
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Type rule: the value must be a date string in one of the default
/// formats; on success it is rebound to a timestamp.
pub fn date() -> Box<dyn Rule> {
    date_with_formats(DEFAULT_FORMATS)
}

/// [`date`] with caller-supplied `chrono` format strings.
pub fn date_with_formats(formats: &[&str]) -> Box<dyn Rule> {
    Box::new(DateType {
        formats: formats.iter().map(|f| (*f).to_string()).collect(),
    })
}

struct DateType {
    formats: Vec<String>,
}

impl Rule for DateType {
    fn name(&self) -> &'static str {
        "date"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match &ctx.value {
            Value::Date(_) => true,
            Value::String(raw) => match parse_date(raw, &self.formats) {
                Some(dt) => {
                    ctx.value = Value::Date(dt);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("date")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Equal,
    Before,
    BeforeEqual,
    After,
    AfterEqual,
}

/// The value must be a date equal to the one at `other`.
pub fn date_equals(other: &str) -> Box<dyn Rule> {
    compare(Comparison::Equal, "date_equals", other)
}

/// The value must be a date strictly before the one at `other`.
pub fn before(other: &str) -> Box<dyn Rule> {
    compare(Comparison::Before, "before", other)
}

pub fn before_equal(other: &str) -> Box<dyn Rule> {
    compare(Comparison::BeforeEqual, "before_equal", other)
}

/// The value must be a date strictly after the one at `other`.
pub fn after(other: &str) -> Box<dyn Rule> {
    compare(Comparison::After, "after", other)
}

pub fn after_equal(other: &str) -> Box<dyn Rule> {
    compare(Comparison::AfterEqual, "after_equal", other)
}

fn compare(mode: Comparison, name: &'static str, other: &str) -> Box<dyn Rule> {
    Box::new(DateComparison {
        name,
        mode,
        other: other.to_string(),
    })
}

struct DateComparison {
    name: &'static str,
    mode: Comparison,
    other: String,
}

impl DateComparison {
    /// The referenced value must already carry a timestamp: its own
    /// `date` rule ran earlier thanks to compile-time ordering.
    fn other_date(&self, ctx: &mut Context) -> Option<NaiveDateTime> {
        let path = match Path::parse(&self.other) {
            Ok(path) => path,
            Err(err) => {
                ctx.add_error(RuleError::new(self.name, err.to_string()));
                return None;
            }
        };
        path.first(ctx.data).and_then(Value::as_date)
    }
}

impl Rule for DateComparison {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let Some(value) = ctx.value.as_date() else {
            return false;
        };
        let Some(other) = self.other_date(ctx) else {
            return false;
        };
        match self.mode {
            Comparison::Equal => value == other,
            Comparison::Before => value < other,
            Comparison::BeforeEqual => value <= other,
            Comparison::After => value > other,
            Comparison::AfterEqual => value >= other,
        }
    }

    fn message_placeholders(&self, ctx: &Context) -> Vec<(String, String)> {
        let display = Path::parse(&self.other)
            .ok()
            .and_then(|p| p.last_name().map(|n| ctx.language.field_name(n).to_string()))
            .unwrap_or_else(|| self.other.clone());
        vec![(":date".to_string(), display)]
    }

    fn referenced_fields(&self) -> Vec<String> {
        vec![self.other.clone()]
    }
}

/// The value must be a date between the dates at `min` and `max`
/// (inclusive bounds excluded).
pub fn date_between(min: &str, max: &str) -> Box<dyn Rule> {
    Box::new(DateBetween {
        min: min.to_string(),
        max: max.to_string(),
    })
}

struct DateBetween {
    min: String,
    max: String,
}

impl DateBetween {
    fn resolve(&self, ctx: &mut Context, which: &str) -> Option<NaiveDateTime> {
        let path = match Path::parse(which) {
            Ok(path) => path,
            Err(err) => {
                ctx.add_error(RuleError::new("date_between", err.to_string()));
                return None;
            }
        };
        path.first(ctx.data).and_then(Value::as_date)
    }
}

impl Rule for DateBetween {
    fn name(&self) -> &'static str {
        "date_between"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let Some(value) = ctx.value.as_date() else {
            return false;
        };
        let min = self.resolve(ctx, &self.min);
        let max = self.resolve(ctx, &self.max);
        match (min, max) {
            (Some(min), Some(max)) => value > min && value < max,
            _ => false,
        }
    }

    fn message_placeholders(&self, ctx: &Context) -> Vec<(String, String)> {
        let display = |raw: &str| {
            Path::parse(raw)
                .ok()
                .and_then(|p| p.last_name().map(|n| ctx.language.field_name(n).to_string()))
                .unwrap_or_else(|| raw.to_string())
        };
        vec![
            (":date".to_string(), display(&self.min)),
            (":max_date".to_string(), display(&self.max)),
        ]
    }

    fn referenced_fields(&self) -> Vec<String> {
        vec![self.min.clone(), self.max.clone()]
    }
}

/// The value must be a date in the past relative to the run timestamp.
pub fn date_before_now() -> Box<dyn Rule> {
    Box::new(DateRelativeNow {
        name: "date_before_now",
        past: true,
    })
}

/// The value must be a date in the future relative to the run timestamp.
pub fn date_after_now() -> Box<dyn Rule> {
    Box::new(DateRelativeNow {
        name: "date_after_now",
        past: false,
    })
}

struct DateRelativeNow {
    name: &'static str,
    past: bool,
}

impl Rule for DateRelativeNow {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let Some(value) = ctx.value.as_date() else {
            return false;
        };
        let now = ctx.now.naive_utc();
        if self.past {
            value < now
        } else {
            value > now
        }
    }
}
