use thiserror::Error;

/// Errors emitted while building fixtures.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("catalog error: {0}")]
    Catalog(#[from] fixturemaker_core::Error),
    #[error("unknown model(s): {}", .0.join(", "))]
    UnknownModels(Vec<String>),
    #[error("no models matched the requested names")]
    NoModels,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
