//! Fixture builder for fixturemaker.
//!
//! This crate turns model catalog entries into fixture records: it resolves
//! placeholder values per field type and follows relations so that every
//! referenced model gets a record of its own.

pub mod defaults;
pub mod errors;
pub mod maker;
pub mod model;
pub mod output;

pub use defaults::FieldDefaults;
pub use errors::GenerationError;
pub use maker::FixtureMaker;
pub use model::{FixtureRecord, GenerationIssue, GenerationReport, MakerOptions, ModelReport};
pub use output::{DEFAULT_INDENT, to_json_string, write_fixtures};
