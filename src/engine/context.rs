//! Per-rule invocation context.

use crate::lang::Language;
use crate::path::Parent;
use crate::ruleset::Field;
use crate::value::{FieldType, Value};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Operational (non-validation) failure reported by a rule, e.g. a
/// database error inside `unique`. Surfaced out-of-band; the validation
/// outcome becomes indeterminate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{rule}: {message}")]
pub struct RuleError {
    pub rule: String,
    pub message: String,
}

impl RuleError {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Everything a rule can observe about the location under validation.
///
/// `value` is an owned slot: type rules rebind it on success and the
/// engine writes the final value back into the input tree.
pub struct Context<'a> {
    /// Root data for cross-field lookups. For composed rule sets this is
    /// the composed root, not the whole input.
    pub data: &'a Value,
    /// The currently-focused value.
    pub value: Value,
    /// Kind of the container holding the value.
    pub parent: Parent,
    /// Object key of the value, when the parent is an object.
    pub name: Option<&'a str>,
    /// The compiled field owning the running rule.
    pub field: &'a Field,
    /// Timestamp captured once at the start of the validation run.
    pub now: DateTime<Utc>,
    /// Caller-supplied ancillary state, passed through untouched.
    pub extra: &'a AHashMap<String, Value>,
    /// Language bundle of the run (message placeholders may localize).
    pub language: &'a Language,
    /// Optional collaborator handles, unused by the core itself.
    pub database: Option<&'a dyn crate::rules::database::Database>,
    pub config: Option<&'a Value>,
    pub(crate) errors: Vec<RuleError>,
}

impl Context<'_> {
    /// Report an operational error. The rule's verdict is ignored and no
    /// validation message is recorded for it.
    pub fn add_error(&mut self, error: RuleError) {
        self.errors.push(error);
    }

    /// Runtime kind of the focused value.
    pub fn value_kind(&self) -> FieldType {
        FieldType::of(&self.value)
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn take_errors(&mut self) -> Vec<RuleError> {
        std::mem::take(&mut self.errors)
    }
}
