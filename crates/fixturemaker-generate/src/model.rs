use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One serialized model instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub pk: Value,
    /// `app_label.ModelName`.
    pub model: String,
    pub fields: Map<String, Value>,
}

/// Options for the fixture maker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MakerOptions {
    /// Emit every field instead of only the required ones.
    pub use_all_fields: bool,
    /// Maximum relation hops followed from a requested model.
    pub max_depth: Option<usize>,
    /// Fail on unknown model names instead of warning.
    pub strict: bool,
}

/// Summary of a built record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    pub model: String,
    /// Relation hops from the nearest requested model.
    pub depth: usize,
    pub fields_emitted: usize,
    pub fields_skipped: usize,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Report for a fixture run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    pub models: Vec<ModelReport>,
    pub unknown_models: Vec<String>,
    /// Related models referenced but not visited because of `max_depth`.
    pub depth_limited: Vec<String>,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }
}
