use thiserror::Error;

/// Core error type shared across fixturemaker crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    /// The catalog violates internal invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    /// A relation or lookup names a model that is not installed.
    #[error("unknown model: {0}")]
    UnknownModel(String),
    /// A requested feature is not yet supported.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Convenience alias for results returned by fixturemaker crates.
pub type Result<T> = std::result::Result<T, Error>;
