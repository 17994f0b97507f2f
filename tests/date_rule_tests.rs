//! Date type rule and the comparator family.

mod common;

use chrono::{TimeZone, Utc};
use common::{check, field_errors};
use json_rules_rs::{rules, validate, Language, Options, RuleSet, Value};
use serde_json::json;

#[test]
fn test_date_accepts_default_formats() {
    let set = RuleSet::new()
        .field("d1", vec![rules::date()])
        .field("d2", vec![rules::date()]);
    let (errors, _) = check(set, json!({"d1": "2024-02-29", "d2": "2024-02-29T10:30:00"}));
    assert!(errors.is_none(), "unexpected errors: {errors:?}");
}

#[test]
fn test_date_rejects_invalid() {
    let set = RuleSet::new().field("d", vec![rules::date()]);
    let (errors, _) = check(set, json!({"d": "2023-02-29"}));
    assert_eq!(field_errors(&errors, "d"), ["The d is not a valid date."]);
}

#[test]
fn test_date_custom_format() {
    let set = RuleSet::new().field("d", vec![rules::date_with_formats(&["%d/%m/%Y"])]);
    let (errors, _) = check(set, json!({"d": "29/02/2024"}));
    assert!(errors.is_none(), "unexpected errors: {errors:?}");

    let set = RuleSet::new().field("d", vec![rules::date_with_formats(&["%d/%m/%Y"])]);
    let (errors, _) = check(set, json!({"d": "2024-02-29"}));
    assert_eq!(field_errors(&errors, "d"), ["The d is not a valid date."]);
}

#[test]
fn test_date_equals_and_before() {
    let set = RuleSet::new()
        .field("a", vec![rules::date()])
        .field("same_day", vec![rules::date(), rules::date_equals("a")])
        .field("earlier", vec![rules::date(), rules::before("a")]);
    let (errors, _) = check(
        set,
        json!({"a": "2024-05-01", "same_day": "2024-05-01", "earlier": "2024-04-30"}),
    );
    assert!(errors.is_none(), "unexpected errors: {errors:?}");
}

#[test]
fn test_before_equal_boundary() {
    let set = RuleSet::new()
        .field("a", vec![rules::date()])
        .field("b", vec![rules::date(), rules::before_equal("a")]);
    let (errors, _) = check(set, json!({"a": "2024-05-01", "b": "2024-05-01"}));
    assert!(errors.is_none());

    let set = RuleSet::new()
        .field("a", vec![rules::date()])
        .field("b", vec![rules::date(), rules::before_equal("a")]);
    let (errors, _) = check(set, json!({"a": "2024-05-01", "b": "2024-05-02"}));
    assert_eq!(
        field_errors(&errors, "b"),
        ["The b must be a date before or equal to a."]
    );
}

#[test]
fn test_date_between_is_exclusive() {
    let set = RuleSet::new()
        .field("lo", vec![rules::date()])
        .field("hi", vec![rules::date()])
        .field("mid", vec![rules::date(), rules::date_between("lo", "hi")]);
    let (errors, _) = check(
        set,
        json!({"lo": "2024-01-01", "hi": "2024-12-31", "mid": "2024-06-15"}),
    );
    assert!(errors.is_none(), "unexpected errors: {errors:?}");

    let set = RuleSet::new()
        .field("lo", vec![rules::date()])
        .field("hi", vec![rules::date()])
        .field("mid", vec![rules::date(), rules::date_between("lo", "hi")]);
    let (errors, _) = check(
        set,
        json!({"lo": "2024-01-01", "hi": "2024-12-31", "mid": "2024-01-01"}),
    );
    assert_eq!(
        field_errors(&errors, "mid"),
        ["The mid must be a date between lo and hi."]
    );
}

#[test]
fn test_comparator_fails_when_other_is_not_a_date() {
    // `other` has no date rule, so the comparison has nothing to compare
    // against and fails.
    let set = RuleSet::new()
        .field("other", vec![rules::string()])
        .field("d", vec![rules::date(), rules::after("other")]);
    let (errors, _) = check(set, json!({"other": "hello", "d": "2024-05-01"}));
    assert_eq!(field_errors(&errors, "d"), ["The d must be a date after other."]);
}

#[test]
fn test_date_before_and_after_now_with_fixed_clock() {
    let compiled = RuleSet::new()
        .field("past", vec![rules::date(), rules::date_before_now()])
        .field("future", vec![rules::date(), rules::date_after_now()])
        .check()
        .unwrap();
    let language = Language::english();
    let mut value = Value::from_json(json!({"past": "2024-01-01", "future": "2024-12-31"}));
    let mut options = Options::new(&mut value, &compiled, &language);
    options.now = Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    let outcome = validate(options).unwrap();
    assert!(outcome.is_none(), "unexpected errors: {outcome:?}");

    let mut value = Value::from_json(json!({"past": "2024-12-31", "future": "2024-01-01"}));
    let mut options = Options::new(&mut value, &compiled, &language);
    options.now = Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    let tree = validate(options).unwrap().expect("both fields fail");
    let json_tree = serde_json::to_value(&tree).unwrap();
    assert_eq!(
        json_tree["fields"]["past"]["errors"][0],
        "The past must be a date in the past."
    );
    assert_eq!(
        json_tree["fields"]["future"]["errors"][0],
        "The future must be a date in the future."
    );
}

#[test]
fn test_timezone_rule() {
    let set = RuleSet::new()
        .field("ok", vec![rules::timezone()])
        .field("bad", vec![rules::timezone()]);
    let (errors, data) = check(
        set,
        json!({"ok": "Europe/Paris", "bad": "Mars/Olympus_Mons"}),
    );
    assert_eq!(
        field_errors(&errors, "bad"),
        ["The bad must be a valid time zone."]
    );
    assert_eq!(data["ok"], json!("Europe/Paris"));
}
