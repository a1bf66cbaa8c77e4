use fixturemaker_core::{catalog_json_schema, validate_catalog_json};
use serde_json::json;

#[test]
fn json_schema_describes_catalog_document() {
    let schema = serde_json::to_value(catalog_json_schema()).expect("serialize json schema");
    let required = schema
        .get("required")
        .and_then(|value| value.as_array())
        .expect("required array");

    assert!(required.contains(&json!("catalog_version")));
    assert!(required.contains(&json!("installed_apps")));
}

#[test]
fn structural_validation_reports_pointer() {
    let document = json!({
        "catalog_version": "0.1",
        "installed_apps": [
            { "name": "blog", "models": [ { "name": "Post", "fields": [ { "name": "title" } ] } ] }
        ]
    });

    let issues = validate_catalog_json(&document).expect("compile schema");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "/installed_apps/0/models/0/fields/0");
}

#[test]
fn structural_validation_accepts_minimal_document() {
    let document = json!({ "catalog_version": "0.1", "installed_apps": [] });
    let issues = validate_catalog_json(&document).expect("compile schema");
    assert!(issues.is_empty());
}
