use json_rules_rs::{validate, Language, Options, RuleSet, Value};
use serde_json::Value as Json;

/// Compile and run a rule set against a JSON document. Returns the
/// serialized error tree (None when valid) and the converted data.
pub fn check(set: RuleSet, data: Json) -> (Option<Json>, Json) {
    let compiled = set.check().expect("rule set should compile");
    let language = Language::english();
    let mut value = Value::from_json(data);
    let options = Options::new(&mut value, &compiled, &language);
    let outcome = validate(options).expect("no operational errors expected");
    (
        outcome.map(|errors| serde_json::to_value(&errors).unwrap()),
        value.to_json(),
    )
}

/// Messages recorded for a single top-level field, empty when none.
pub fn field_errors(errors: &Option<Json>, name: &str) -> Vec<String> {
    errors
        .as_ref()
        .and_then(|tree| tree.get("fields"))
        .and_then(|fields| fields.get(name))
        .and_then(|node| node.get("errors"))
        .and_then(Json::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
