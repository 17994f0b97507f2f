//! String rules: affixes, character classes, patterns and trimming.

use super::Rule;
use crate::cache;
use crate::engine::context::Context;
use crate::ruleset::CompileError;
use crate::value::Value;

const ALPHA_PATTERN: &str = r"^[\pL\pM]+$";
const ALPHA_NUM_PATTERN: &str = r"^[\pL\pM0-9]+$";
const ALPHA_DASH_PATTERN: &str = r"^[\pL\pM0-9_-]+$";

// HTML5 input[type=email] pattern.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// The string must start with one of `prefixes`.
pub fn starts_with(prefixes: &[&str]) -> Box<dyn Rule> {
    affix("starts_with", Affix::Start, false, prefixes)
}

/// The string must not start with any of `prefixes`.
pub fn doesnt_start_with(prefixes: &[&str]) -> Box<dyn Rule> {
    affix("doesnt_start_with", Affix::Start, true, prefixes)
}

/// The string must end with one of `suffixes`.
pub fn ends_with(suffixes: &[&str]) -> Box<dyn Rule> {
    affix("ends_with", Affix::End, false, suffixes)
}

/// The string must not end with any of `suffixes`.
pub fn doesnt_end_with(suffixes: &[&str]) -> Box<dyn Rule> {
    affix("doesnt_end_with", Affix::End, true, suffixes)
}

#[derive(Debug, Clone, Copy)]
enum Affix {
    Start,
    End,
}

fn affix(name: &'static str, affix: Affix, negate: bool, values: &[&str]) -> Box<dyn Rule> {
    Box::new(AffixRule {
        name,
        affix,
        negate,
        values: values.iter().map(|v| (*v).to_string()).collect(),
    })
}

struct AffixRule {
    name: &'static str,
    affix: Affix,
    negate: bool,
    values: Vec<String>,
}

impl Rule for AffixRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let Some(s) = ctx.value.as_str() else {
            return false;
        };
        let matched = self.values.iter().any(|v| match self.affix {
            Affix::Start => s.starts_with(v.as_str()),
            Affix::End => s.ends_with(v.as_str()),
        });
        matched != self.negate
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        vec![(":values".to_string(), self.values.join(", "))]
    }
}

/// The string must contain ASCII digits only.
pub fn digits() -> Box<dyn Rule> {
    Box::new(Digits)
}

struct Digits;

impl Rule for Digits {
    fn name(&self) -> &'static str {
        "digits"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match ctx.value.as_str() {
            Some(s) => !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }
}

/// The string must contain letters only.
pub fn alpha() -> Box<dyn Rule> {
    pattern_rule("alpha", ALPHA_PATTERN)
}

/// The string must contain letters and digits only.
pub fn alpha_num() -> Box<dyn Rule> {
    pattern_rule("alpha_num", ALPHA_NUM_PATTERN)
}

/// The string must contain letters, digits, dashes and underscores only.
pub fn alpha_dash() -> Box<dyn Rule> {
    pattern_rule("alpha_dash", ALPHA_DASH_PATTERN)
}

/// The string must be a valid email address.
pub fn email() -> Box<dyn Rule> {
    pattern_rule("email", EMAIL_PATTERN)
}

/// The string must match `pattern`. The pattern is compiled through the
/// process-wide cache; a malformed pattern fails rule-set compilation.
pub fn regex(pattern: &str) -> Box<dyn Rule> {
    Box::new(PatternRule {
        name: "regex",
        pattern: pattern.to_string(),
    })
}

fn pattern_rule(name: &'static str, pattern: &str) -> Box<dyn Rule> {
    Box::new(PatternRule {
        name,
        pattern: pattern.to_string(),
    })
}

struct PatternRule {
    name: &'static str,
    pattern: String,
}

impl Rule for PatternRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let Some(s) = ctx.value.as_str() else {
            return false;
        };
        match cache::regex(&self.pattern) {
            Ok(compiled) => compiled.is_match(s),
            Err(_) => false,
        }
    }

    fn check(&self) -> Result<(), CompileError> {
        cache::regex(&self.pattern).map_err(|err| CompileError::InvalidParameter {
            rule: self.name,
            reason: err.to_string(),
        })?;
        Ok(())
    }
}

/// Rewrite the string with surrounding whitespace removed.
pub fn trim() -> Box<dyn Rule> {
    Box::new(Trim)
}

struct Trim;

impl Rule for Trim {
    fn name(&self) -> &'static str {
        "trim"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match &ctx.value {
            Value::String(s) => {
                ctx.value = Value::String(s.trim().to_string());
                true
            }
            _ => false,
        }
    }
}
