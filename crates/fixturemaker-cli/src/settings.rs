use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "fixturemaker.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
}

/// File-level settings; command-line flags take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: Option<PathBuf>,
    pub use_all_fields: bool,
    pub max_depth: Option<usize>,
    pub strict: bool,
    pub indent: Option<usize>,
    /// Per-type overrides for the default value table.
    pub defaults: BTreeMap<String, serde_json::Value>,
}

/// Load settings from `explicit`, or from [`DEFAULT_CONFIG_FILE`] when it
/// exists. An explicit path must exist.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    parse_settings(&content)
}

pub fn parse_settings(content: &str) -> Result<Settings, SettingsError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_overrides_table() {
        let settings = parse_settings(
            r#"
catalog = "catalogs/blog.catalog.json"
use_all_fields = true
max_depth = 2

[defaults]
CharField = "placeholder"
PolygonField = "POLYGON EMPTY"
IntegerField = 7
"#,
        )
        .expect("parse settings");

        assert_eq!(
            settings.catalog,
            Some(PathBuf::from("catalogs/blog.catalog.json"))
        );
        assert!(settings.use_all_fields);
        assert_eq!(settings.max_depth, Some(2));
        assert!(!settings.strict);
        assert_eq!(settings.defaults.get("IntegerField"), Some(&json!(7)));
        assert_eq!(settings.defaults.len(), 3);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = parse_settings("").expect("parse settings");
        assert!(settings.catalog.is_none());
        assert!(settings.defaults.is_empty());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_settings(Some(Path::new("does/not/exist.toml"))).expect_err("missing");
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
