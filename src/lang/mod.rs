//! Language bundles: message templates and field display names.
//!
//! A [`Language`] is a flat key → template map. Rule messages live under
//! `validation.rules.<rule>[.<expected-type>][.array]`, field display
//! names under `validation.fields.<name>`. The bundle store itself
//! (loading, per-request negotiation) is the caller's concern; the engine
//! only consumes one bundle per run.

pub mod placeholders;

use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct Language {
    locale: String,
    entries: IndexMap<String, String>,
}

impl Language {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            entries: IndexMap::new(),
        }
    }

    /// The built-in `en-US` bundle covering every built-in rule.
    pub fn english() -> Self {
        let mut lang = Self::new("en-US");
        for (key, template) in ENGLISH {
            lang.entries
                .insert(format!("validation.rules.{key}"), (*template).to_string());
        }
        lang
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Merge entries, overriding existing keys.
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in entries {
            self.entries.insert(key.into(), value.into());
        }
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Display name of a field: `validation.fields.<name>` entry, falling
    /// back to the raw name.
    pub fn field_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(&format!("validation.fields.{name}")).unwrap_or(name)
    }

    /// Message lookup with suffix fallback: the fully-suffixed key first,
    /// then without the `.array` suffix, then the bare rule key. A miss
    /// everywhere renders the key itself so broken lookups stay visible.
    pub fn message(&self, keys: &[String]) -> String {
        for key in keys {
            if let Some(template) = self.get(key) {
                return template.to_string();
            }
        }
        keys.last().cloned().unwrap_or_default()
    }
}

const ENGLISH: &[(&str, &str)] = &[
    ("required", "The :field is required."),
    ("nullable", "The :field must be present."),
    ("array", "The :field must be an array."),
    ("array.array", "The :field values must be arrays."),
    ("object", "The :field must be an object."),
    ("object.array", "The :field values must be objects."),
    ("string", "The :field must be a string."),
    ("string.array", "The :field values must be strings."),
    ("bool", "The :field must be a boolean."),
    ("bool.array", "The :field values must be booleans."),
    ("numeric", "The :field must be numeric."),
    ("numeric.array", "The :field values must be numeric."),
    ("int", "The :field must be an integer."),
    ("int.array", "The :field values must be integers."),
    ("int8", "The :field must be an integer."),
    ("int16", "The :field must be an integer."),
    ("int32", "The :field must be an integer."),
    ("int64", "The :field must be an integer."),
    ("uint", "The :field must be a positive integer."),
    ("uint.array", "The :field values must be positive integers."),
    ("uint8", "The :field must be a positive integer."),
    ("uint16", "The :field must be a positive integer."),
    ("uint32", "The :field must be a positive integer."),
    ("uint64", "The :field must be a positive integer."),
    ("float32", "The :field must be numeric."),
    ("float64", "The :field must be numeric."),
    ("date", "The :field is not a valid date."),
    ("date.array", "The :field values are not valid dates."),
    ("date_equals", "The :field must be a date equal to :date."),
    ("before", "The :field must be a date before :date."),
    ("before_equal", "The :field must be a date before or equal to :date."),
    ("after", "The :field must be a date after :date."),
    ("after_equal", "The :field must be a date after or equal to :date."),
    ("date_between", "The :field must be a date between :date and :max_date."),
    ("date_before_now", "The :field must be a date in the past."),
    ("date_after_now", "The :field must be a date in the future."),
    ("in", "The :field must be one of the following: :values."),
    ("not_in", "The :field must not be one of the following: :values."),
    ("in_field", "The :field must be present in the :other."),
    ("not_in_field", "The :field must not be present in the :other."),
    ("keys_in", "The :field keys must be one of the following: :values."),
    ("distinct", "The :field has a duplicate value."),
    ("min.string", "The :field must be at least :min characters."),
    ("min.string.array", "The :field values must be at least :min characters."),
    ("min.numeric", "The :field must be at least :min."),
    ("min.numeric.array", "The :field values must be at least :min."),
    ("min.array", "The :field must have at least :min items."),
    ("min.object", "The :field must have at least :min keys."),
    ("min.file", "The :field must be at least :min KiB."),
    ("max.string", "The :field must not exceed :max characters."),
    ("max.string.array", "The :field values must not exceed :max characters."),
    ("max.numeric", "The :field must not exceed :max."),
    ("max.numeric.array", "The :field values must not exceed :max."),
    ("max.array", "The :field must not have more than :max items."),
    ("max.object", "The :field must not have more than :max keys."),
    ("max.file", "The :field must not exceed :max KiB."),
    ("between.string", "The :field must be between :min and :max characters."),
    ("between.numeric", "The :field must be between :min and :max."),
    ("between.array", "The :field must have between :min and :max items."),
    ("between.object", "The :field must have between :min and :max keys."),
    ("between.file", "The :field must be between :min and :max KiB."),
    ("size.string", "The :field must be exactly :value characters."),
    ("size.array", "The :field must contain exactly :value items."),
    ("size.object", "The :field must have exactly :value keys."),
    ("size.file", "The :field must be exactly :value KiB."),
    ("greater_than.string", "The :field must be longer than the :other."),
    ("greater_than.numeric", "The :field must be greater than the :other."),
    ("greater_than.array", "The :field must have more items than the :other."),
    ("greater_than.file", "The :field must be larger than the :other."),
    ("greater_than_equal.string", "The :field must be at least as long as the :other."),
    ("greater_than_equal.numeric", "The :field must be greater than or equal to the :other."),
    ("greater_than_equal.array", "The :field must have at least as many items as the :other."),
    ("greater_than_equal.file", "The :field must be at least as large as the :other."),
    ("lower_than.string", "The :field must be shorter than the :other."),
    ("lower_than.numeric", "The :field must be lower than the :other."),
    ("lower_than.array", "The :field must have fewer items than the :other."),
    ("lower_than.file", "The :field must be smaller than the :other."),
    ("lower_than_equal.string", "The :field must be at most as long as the :other."),
    ("lower_than_equal.numeric", "The :field must be lower than or equal to the :other."),
    ("lower_than_equal.array", "The :field must not have more items than the :other."),
    ("lower_than_equal.file", "The :field must be at most as large as the :other."),
    ("same", "The :field and the :other must match."),
    ("different", "The :field and the :other must be different."),
    ("starts_with", "The :field must start with one of the following: :values."),
    ("doesnt_start_with", "The :field must not start with one of the following: :values."),
    ("ends_with", "The :field must end with one of the following: :values."),
    ("doesnt_end_with", "The :field must not end with one of the following: :values."),
    ("digits", "The :field must be digits only."),
    ("alpha", "The :field may only contain letters."),
    ("alpha_num", "The :field may only contain letters and numbers."),
    ("alpha_dash", "The :field may only contain letters, numbers, dashes and underscores."),
    ("regex", "The :field format is invalid."),
    ("email", "The :field must be a valid email address."),
    ("url", "The :field must be a valid URL."),
    ("ip", "The :field must be a valid IP address."),
    ("ipv4", "The :field must be a valid IPv4 address."),
    ("ipv6", "The :field must be a valid IPv6 address."),
    ("uuid", "The :field must be a valid UUID:version."),
    ("json", "The :field must be valid JSON."),
    ("timezone", "The :field must be a valid time zone."),
    ("trim", "The :field must be a string."),
    ("file", "The :field must be a file."),
    ("mime", "The :field must be a file of type: :values."),
    ("image", "The :field must be an image."),
    ("extension", "The :field must have one of the following extensions: :values."),
    ("count", "The :field must have exactly :value files."),
    ("count_min", "The :field must have at least :min files."),
    ("count_max", "The :field must not have more than :max files."),
    ("count_between", "The :field must have between :min and :max files."),
    ("unique", "The :field has already been taken."),
    ("exists", "The selected :field is invalid."),
];
