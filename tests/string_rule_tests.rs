//! String rules: affixes, character classes, patterns, identifiers.

mod common;

use common::{check, field_errors};
use json_rules_rs::{rules, RuleSet};
use serde_json::json;

#[test]
fn test_starts_with() {
    let set = RuleSet::new().field("v", vec![rules::starts_with(&["img_", "pic_"])]);
    let (errors, _) = check(set, json!({"v": "doc_1"}));
    assert_eq!(
        field_errors(&errors, "v"),
        ["The v must start with one of the following: img_, pic_."]
    );

    let set = RuleSet::new().field("v", vec![rules::starts_with(&["img_"])]);
    let (errors, _) = check(set, json!({"v": "img_1"}));
    assert!(errors.is_none());
}

#[test]
fn test_doesnt_end_with() {
    let set = RuleSet::new().field("v", vec![rules::doesnt_end_with(&[".exe"])]);
    let (errors, _) = check(set, json!({"v": "setup.exe"}));
    assert_eq!(
        field_errors(&errors, "v"),
        ["The v must not end with one of the following: .exe."]
    );
}

#[test]
fn test_digits() {
    let set = RuleSet::new()
        .field("ok", vec![rules::digits()])
        .field("bad", vec![rules::digits()]);
    let (errors, _) = check(set, json!({"ok": "0123", "bad": "12a"}));
    assert_eq!(field_errors(&errors, "ok"), Vec::<String>::new());
    assert_eq!(field_errors(&errors, "bad"), ["The bad must be digits only."]);
}

#[test]
fn test_alpha_accepts_unicode_letters() {
    let set = RuleSet::new()
        .field("ok", vec![rules::alpha()])
        .field("bad", vec![rules::alpha()]);
    let (errors, _) = check(set, json!({"ok": "héllo", "bad": "h3llo"}));
    assert_eq!(field_errors(&errors, "ok"), Vec::<String>::new());
    assert_eq!(
        field_errors(&errors, "bad"),
        ["The bad may only contain letters."]
    );
}

#[test]
fn test_alpha_dash() {
    let set = RuleSet::new().field("slug", vec![rules::alpha_dash()]);
    let (errors, _) = check(set, json!({"slug": "my-slug_01"}));
    assert!(errors.is_none());

    let set = RuleSet::new().field("slug", vec![rules::alpha_dash()]);
    let (errors, _) = check(set, json!({"slug": "my slug"}));
    assert_eq!(
        field_errors(&errors, "slug"),
        ["The slug may only contain letters, numbers, dashes and underscores."]
    );
}

#[test]
fn test_regex_rule() {
    let set = RuleSet::new().field("code", vec![rules::regex("^[A-Z]{3}-[0-9]{2}$")]);
    let (errors, _) = check(set, json!({"code": "ABC-12"}));
    assert!(errors.is_none());

    let set = RuleSet::new().field("code", vec![rules::regex("^[A-Z]{3}-[0-9]{2}$")]);
    let (errors, _) = check(set, json!({"code": "abc-12"}));
    assert_eq!(field_errors(&errors, "code"), ["The code format is invalid."]);
}

#[test]
fn test_email() {
    let set = RuleSet::new()
        .field("ok", vec![rules::email()])
        .field("bad", vec![rules::email()]);
    let (errors, _) = check(set, json!({"ok": "dev@example.co", "bad": "not-an-email"}));
    assert_eq!(field_errors(&errors, "ok"), Vec::<String>::new());
    assert_eq!(
        field_errors(&errors, "bad"),
        ["The bad must be a valid email address."]
    );
}

#[test]
fn test_trim_rewrites_value() {
    let set = RuleSet::new().field("name", vec![rules::trim(), rules::min(3.0)]);
    let (errors, data) = check(set, json!({"name": "  Ada  "}));
    assert!(errors.is_none());
    assert_eq!(data, json!({"name": "Ada"}));
}

#[test]
fn test_sizes_count_graphemes_not_chars() {
    // Four grapheme clusters; char and byte counts are higher, so an
    // upper bound of 4 only holds when graphemes are measured.
    let set = RuleSet::new().field("name", vec![rules::max(4.0)]);
    let (errors, _) = check(set, json!({"name": "é́👍é́a"}));
    assert!(errors.is_none(), "unexpected errors: {errors:?}");
}
