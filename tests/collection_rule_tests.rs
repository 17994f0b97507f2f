//! Membership, identifier and file rules, plus database-backed lookups.

mod common;

use common::{check, field_errors};
use json_rules_rs::{
    rules, validate, Database, Language, Options, RuleError, RuleSet, Value,
};
use serde_json::json;

#[test]
fn test_in_and_not_in() {
    let allowed = || vec![Value::String("red".into()), Value::String("blue".into())];
    let set = RuleSet::new().field("color", vec![rules::is_in(allowed())]);
    let (errors, _) = check(set, json!({"color": "green"}));
    assert_eq!(
        field_errors(&errors, "color"),
        ["The color must be one of the following: red, blue."]
    );

    let set = RuleSet::new().field("color", vec![rules::not_in(allowed())]);
    let (errors, _) = check(set, json!({"color": "red"}));
    assert_eq!(
        field_errors(&errors, "color"),
        ["The color must not be one of the following: red, blue."]
    );
}

#[test]
fn test_in_field() {
    let set = RuleSet::new()
        .field("choices", vec![rules::array()])
        .field("pick", vec![rules::in_field("choices")]);
    let (errors, _) = check(set, json!({"choices": ["a", "b"], "pick": "c"}));
    assert_eq!(
        field_errors(&errors, "pick"),
        ["The pick must be present in the choices."]
    );

    let set = RuleSet::new()
        .field("choices", vec![rules::array()])
        .field("pick", vec![rules::in_field("choices")]);
    let (errors, _) = check(set, json!({"choices": ["a", "b"], "pick": "b"}));
    assert!(errors.is_none());
}

#[test]
fn test_keys_in() {
    let set = RuleSet::new().field("opts", vec![rules::keys_in(&["mode", "level"])]);
    let (errors, _) = check(set, json!({"opts": {"mode": 1, "depth": 2}}));
    assert_eq!(
        field_errors(&errors, "opts"),
        ["The opts keys must be one of the following: mode, level."]
    );
}

#[test]
fn test_distinct() {
    let set = RuleSet::new().field("ids", vec![rules::array(), rules::distinct()]);
    let (errors, _) = check(set, json!({"ids": [1, 2, 1]}));
    assert_eq!(field_errors(&errors, "ids"), ["The ids has a duplicate value."]);

    let set = RuleSet::new().field("ids", vec![rules::array(), rules::distinct()]);
    let (errors, _) = check(set, json!({"ids": [1, 2, 3]}));
    assert!(errors.is_none());
}

#[test]
fn test_url_converts_and_rejects() {
    let set = RuleSet::new()
        .field("ok", vec![rules::url()])
        .field("bad", vec![rules::url()]);
    let (errors, data) = check(
        set,
        json!({"ok": "https://example.com/x?q=1", "bad": "not a url"}),
    );
    assert_eq!(field_errors(&errors, "bad"), ["The bad must be a valid URL."]);
    assert_eq!(data["ok"], json!("https://example.com/x?q=1"));
}

#[test]
fn test_ip_family() {
    let set = RuleSet::new()
        .field("any", vec![rules::ip()])
        .field("v4", vec![rules::ipv4()])
        .field("v6", vec![rules::ipv6()]);
    let (errors, _) = check(
        set,
        json!({"any": "::1", "v4": "127.0.0.1", "v6": "2001:db8::1"}),
    );
    assert!(errors.is_none(), "unexpected errors: {errors:?}");

    let set = RuleSet::new().field("v4", vec![rules::ipv4()]);
    let (errors, _) = check(set, json!({"v4": "::1"}));
    assert_eq!(
        field_errors(&errors, "v4"),
        ["The v4 must be a valid IPv4 address."]
    );
}

#[test]
fn test_uuid_versions() {
    let set = RuleSet::new().field("id", vec![rules::uuid()]);
    let (errors, _) = check(set, json!({"id": "936a7b5c-9de1-4b3f-8d1c-3f1a9f2b7d10"}));
    assert!(errors.is_none());

    // v1-only rule rejects a v4 identifier and names the version.
    let set = RuleSet::new().field("id", vec![rules::uuid_versions(&[1])]);
    let (errors, _) = check(set, json!({"id": "936a7b5c-9de1-4b3f-8d1c-3f1a9f2b7d10"}));
    assert_eq!(field_errors(&errors, "id"), ["The id must be a valid UUID v1."]);
}

fn run_with_files(
    set: RuleSet,
    files: Vec<json_rules_rs::File>,
) -> (Option<serde_json::Value>, Value) {
    let compiled = set.check().unwrap();
    let language = Language::english();
    let mut data = Value::Object(
        [("upload".to_string(), Value::Files(files))]
            .into_iter()
            .collect(),
    );
    let outcome = validate(Options::new(&mut data, &compiled, &language)).unwrap();
    (
        outcome.map(|errors| serde_json::to_value(&errors).unwrap()),
        data,
    )
}

#[test]
fn test_file_rules() {
    let files = vec![
        json_rules_rs::File::new("a.png", Some("image/png".into()), 2048),
        json_rules_rs::File::new("b.jpg", Some("image/jpeg".into()), 4096),
    ];
    let set = RuleSet::new().field(
        "upload",
        vec![
            rules::file(),
            rules::image(),
            rules::extension(&["png", "jpg"]),
            rules::count_max(3),
            rules::max(10.0),
        ],
    );
    let (errors, _) = run_with_files(set, files);
    assert!(errors.is_none(), "unexpected errors: {errors:?}");
}

#[test]
fn test_file_mime_and_size_failures() {
    let files = vec![json_rules_rs::File::new(
        "doc.pdf",
        Some("application/pdf".into()),
        4096,
    )];
    let set = RuleSet::new().field(
        "upload",
        vec![rules::file(), rules::image(), rules::max(2.0)],
    );
    let (errors, _) = run_with_files(set, files);
    let tree = errors.unwrap();
    let messages = &tree["fields"]["upload"]["errors"];
    assert_eq!(messages[0], "The upload must be an image.");
    assert_eq!(messages[1], "The upload must not exceed 2 KiB.");
}

#[test]
fn test_count_between() {
    let files = vec![json_rules_rs::File::new("one.txt", None, 10)];
    let set = RuleSet::new().field("upload", vec![rules::file(), rules::count_between(2, 4)]);
    let (errors, _) = run_with_files(set, files);
    let tree = errors.unwrap();
    assert_eq!(
        tree["fields"]["upload"]["errors"][0],
        "The upload must have between 2 and 4 files."
    );
}

struct FakeDb {
    taken: Vec<String>,
    fail: bool,
}

impl Database for FakeDb {
    fn count(&self, _table: &str, _column: &str, value: &Value) -> Result<u64, String> {
        if self.fail {
            return Err("connection refused".to_string());
        }
        let hit = value
            .as_str()
            .map(|s| self.taken.iter().any(|t| t == s))
            .unwrap_or(false);
        Ok(hit as u64)
    }
}

fn run_with_db(set: RuleSet, data: serde_json::Value, db: &FakeDb) -> Result<Option<serde_json::Value>, Vec<RuleError>> {
    let compiled = set.check().unwrap();
    let language = Language::english();
    let mut value = Value::from_json(data);
    let mut options = Options::new(&mut value, &compiled, &language);
    options.database = Some(db);
    validate(options).map(|outcome| outcome.map(|errors| serde_json::to_value(&errors).unwrap()))
}

#[test]
fn test_unique_and_exists() {
    let db = FakeDb {
        taken: vec!["ada".to_string()],
        fail: false,
    };
    let set = RuleSet::new().field("username", vec![rules::unique("users", "username")]);
    let tree = run_with_db(set, json!({"username": "ada"}), &db)
        .unwrap()
        .unwrap();
    assert_eq!(
        tree["fields"]["username"]["errors"][0],
        "The username has already been taken."
    );

    let set = RuleSet::new().field("owner", vec![rules::exists("users", "username")]);
    let tree = run_with_db(set, json!({"owner": "nobody"}), &db)
        .unwrap()
        .unwrap();
    assert_eq!(
        tree["fields"]["owner"]["errors"][0],
        "The selected owner is invalid."
    );
}

#[test]
fn test_database_failure_is_operational() {
    let db = FakeDb {
        taken: Vec::new(),
        fail: true,
    };
    let set = RuleSet::new().field("username", vec![rules::unique("users", "username")]);
    let result = run_with_db(set, json!({"username": "ada"}), &db);
    let op_errors = result.expect_err("operational channel expected");
    assert_eq!(op_errors.len(), 1);
    assert_eq!(op_errors[0].rule, "unique");
    assert!(op_errors[0].message.contains("connection refused"));
}

#[test]
fn test_operational_error_does_not_block_other_fields() {
    // The run completes and reports every operational error.
    let db = FakeDb {
        taken: Vec::new(),
        fail: true,
    };
    let set = RuleSet::new()
        .field("a", vec![rules::unique("users", "a")])
        .field("b", vec![rules::unique("users", "b")]);
    let result = run_with_db(set, json!({"a": "x", "b": "y"}), &db);
    assert_eq!(result.expect_err("operational").len(), 2);
}
