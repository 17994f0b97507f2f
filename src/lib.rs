//! JSON Rules RS - Structured-data validation engine
//!
//! Validates arbitrary decoded input trees against declarative rule sets:
//! - Path language addressing deeply nested fields and array elements
//! - Compiled, reusable rule sets with cross-field dependency ordering
//! - Mirrored error trees so clients can point-show failures per field
//! - In-place normalization: values are rewritten to their typed form
//!   (dates, UUIDs, IPs, URLs, numbers parsed from strings)
//! - Localized messages with placeholder expansion
//!
//! ```
//! use json_rules_rs::{rules, Language, Options, RuleSet, Value};
//! use serde_json::json;
//!
//! let compiled = RuleSet::new()
//!     .field("name", vec![rules::required(), rules::string()])
//!     .check()
//!     .unwrap();
//!
//! let mut data = Value::from_json(json!({"name": "Ada"}));
//! let language = Language::english();
//! let outcome = json_rules_rs::validate(Options::new(&mut data, &compiled, &language));
//! assert!(matches!(outcome, Ok(None)));
//! ```

pub mod cache;
pub mod engine;
pub mod errors;
pub mod lang;
pub mod path;
pub mod rules;
pub mod ruleset;
pub mod value;

// Re-export main types for convenience
pub use engine::{validate, Context, Options, RuleError};
pub use errors::{Errors, MISSING_ELEMENT};
pub use lang::placeholders::register_placeholder;
pub use lang::Language;
pub use path::{Found, Parent, Path, PathError, Step, CURRENT_ELEMENT};
pub use rules::{Database, List, Marker, Rule};
pub use ruleset::{CompileError, Field, FieldRules, Rules, RuleSet};
pub use value::{FieldType, File, Value};
