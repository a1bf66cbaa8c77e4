use jsonschema::JSONSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::catalog::ModelCatalog;
use crate::error::{Error, Result};

/// Structural issue found in a raw catalog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub code: String,
    /// JSON pointer to the offending value.
    pub path: String,
    pub message: String,
}

/// Emit the JSON Schema for catalog documents.
pub fn catalog_json_schema() -> RootSchema {
    schema_for!(ModelCatalog)
}

/// Validate a raw catalog document against the catalog JSON Schema.
pub fn validate_catalog_json(document: &Value) -> Result<Vec<ValidationIssue>> {
    let schema = serde_json::to_value(catalog_json_schema())?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| Error::InvalidCatalog(err.to_string()))?;

    let mut issues = Vec::new();
    if let Err(errors) = compiled.validate(document) {
        for error in errors {
            issues.push(ValidationIssue {
                code: "schema_violation".to_string(),
                path: normalized_json_pointer(&error.instance_path.to_string()),
                message: error.to_string(),
            });
        }
    }

    Ok(issues)
}

fn normalized_json_pointer(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
