//! Core contracts for fixturemaker.
//!
//! This crate defines the model catalog (installed apps, models and their
//! field metadata), lookup and relation resolution, and validation helpers
//! shared by the generator and the CLI.

pub mod catalog;
pub mod error;
pub mod graph;
pub mod json_schema;
pub mod types;
pub mod validation;

pub use catalog::{AppConfig, FieldDef, ModelCatalog, ModelDef, ModelLookup, ModelRef};
pub use error::{Error, Result};
pub use graph::{RelationGraphReport, RelationGraphSummary, build_relation_graph_report};
pub use json_schema::{ValidationIssue, catalog_json_schema, validate_catalog_json};
pub use types::{DefaultCallable, DefaultValue, FieldType, Relation, RelationKind};
pub use validation::validate_catalog;

/// Current contract version for catalog documents.
pub const CATALOG_VERSION: &str = "0.1";
