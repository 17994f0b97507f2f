//! Rule set compilation: flattening, synthetic parents, element lifting,
//! duplicate detection and cross-field ordering.

use json_rules_rs::{rules, CompileError, RuleSet};

#[test]
fn test_duplicate_path_rejected() {
    let result = RuleSet::new()
        .field("name", vec![rules::string()])
        .field("name", vec![rules::int()])
        .check();
    assert!(matches!(result, Err(CompileError::DuplicatePath(path)) if path == "name"));
}

#[test]
fn test_malformed_path_rejected() {
    let result = RuleSet::new().field("a..b", vec![rules::string()]).check();
    assert!(matches!(result, Err(CompileError::Path(_))));
}

#[test]
fn test_invalid_regex_fails_compilation() {
    let result = RuleSet::new().field("code", vec![rules::regex("[")]).check();
    assert!(matches!(
        result,
        Err(CompileError::InvalidParameter { rule: "regex", .. })
    ));
}

#[test]
fn test_elements_lifted_into_parent() {
    let compiled = RuleSet::new()
        .field("tags", vec![rules::array()])
        .field("tags[]", vec![rules::string()])
        .check()
        .unwrap();
    assert_eq!(compiled.fields().len(), 1);
    let tags = &compiled.fields()[0];
    assert_eq!(tags.path().to_string(), "tags");
    let elements = tags.elements().expect("tags[] lifted into elements");
    assert_eq!(elements.path().to_string(), "tags[]");
    assert_eq!(elements.walk_path().to_string(), "[]");
}

#[test]
fn test_missing_array_parent_synthesized() {
    let compiled = RuleSet::new()
        .field("tags[]", vec![rules::string()])
        .check()
        .unwrap();
    assert_eq!(compiled.fields().len(), 1);
    let tags = &compiled.fields()[0];
    assert_eq!(tags.path().to_string(), "tags");
    assert!(tags.is_array());
    assert!(tags.elements().is_some());
}

#[test]
fn test_multi_dimension_synthesis_chains() {
    let compiled = RuleSet::new()
        .field("grid[][]", vec![rules::numeric()])
        .check()
        .unwrap();
    assert_eq!(compiled.fields().len(), 1);
    let grid = &compiled.fields()[0];
    assert_eq!(grid.path().to_string(), "grid");
    let rows = grid.elements().expect("grid[] synthesized and lifted");
    assert_eq!(rows.path().to_string(), "grid[]");
    let cells = rows.elements().expect("grid[][] lifted one level deeper");
    assert_eq!(cells.path().to_string(), "grid[][]");
}

#[test]
fn test_cross_field_reference_ordered_first() {
    let compiled = RuleSet::new()
        .field("end", vec![rules::date(), rules::after("start")])
        .field("start", vec![rules::date()])
        .check()
        .unwrap();
    let order: Vec<String> = compiled
        .fields()
        .iter()
        .map(|f| f.path().to_string())
        .collect();
    assert_eq!(order, ["start", "end"]);
}

#[test]
fn test_cyclic_references_tolerated() {
    let compiled = RuleSet::new()
        .field("a", vec![rules::same("b")])
        .field("b", vec![rules::same("a")])
        .check()
        .unwrap();
    // No guaranteed relative order, but compilation terminates and keeps
    // both fields.
    assert_eq!(compiled.fields().len(), 2);
}

#[test]
fn test_declaration_order_preserved_without_references() {
    let compiled = RuleSet::new()
        .field("z", vec![rules::string()])
        .field("a", vec![rules::string()])
        .field("m", vec![rules::string()])
        .check()
        .unwrap();
    let order: Vec<String> = compiled
        .fields()
        .iter()
        .map(|f| f.path().to_string())
        .collect();
    assert_eq!(order, ["z", "a", "m"]);
}

#[test]
fn test_composition_prefixes_paths() {
    let address = RuleSet::new()
        .field("city", vec![rules::required(), rules::string()])
        .field("zip", vec![rules::required(), rules::digits()]);
    let compiled = RuleSet::new()
        .field("name", vec![rules::string()])
        .compose("address", address)
        .check()
        .unwrap();
    let order: Vec<String> = compiled
        .fields()
        .iter()
        .map(|f| f.path().to_string())
        .collect();
    assert_eq!(order, ["name", "address.city", "address.zip"]);
    assert_eq!(compiled.fields()[1].prefix_depth(), 1);
    assert_eq!(compiled.fields()[0].prefix_depth(), 0);
}

#[test]
fn test_nested_composition_depth() {
    let inner = RuleSet::new().field("street", vec![rules::string()]);
    let middle = RuleSet::new().compose("address", inner);
    let compiled = RuleSet::new().compose("user", middle).check().unwrap();
    let field = &compiled.fields()[0];
    assert_eq!(field.path().to_string(), "user.address.street");
    assert_eq!(field.prefix_depth(), 2);
}

#[test]
fn test_composition_duplicate_across_levels_rejected() {
    let nested = RuleSet::new().field("city", vec![rules::string()]);
    let result = RuleSet::new()
        .field("address.city", vec![rules::string()])
        .compose("address", nested)
        .check();
    assert!(matches!(result, Err(CompileError::DuplicatePath(path)) if path == "address.city"));
}

#[test]
fn test_field_flags_cached_from_validators() {
    let compiled = RuleSet::new()
        .field(
            "payload",
            vec![rules::required(), rules::nullable(), rules::object()],
        )
        .check()
        .unwrap();
    let field = &compiled.fields()[0];
    assert!(field.is_object());
    assert!(field.is_nullable());
    assert!(!field.is_array());
}

#[test]
fn test_check_is_idempotent() {
    let compiled = RuleSet::new()
        .field("name", vec![rules::string()])
        .check()
        .unwrap();
    let rechecked = compiled.check();
    assert_eq!(rechecked.fields().len(), 1);
    assert_eq!(rechecked.fields()[0].path().to_string(), "name");
}
