use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use fixturemaker_generate::GenerationReport;

use super::{RegistryError, RegistryResult};

/// Serializable options for runs.
#[derive(Debug, Clone, Serialize)]
pub struct RunOptions {
    pub use_all_fields: bool,
    pub max_depth: Option<usize>,
    pub strict: bool,
    pub indent: usize,
    pub models: Vec<String>,
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub catalog_version: String,
    pub catalog: PathBuf,
    pub run_dir: PathBuf,
    pub options: RunOptions,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub catalog_version: String,
    pub catalog: String,
    pub options: RunOptions,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub fixtures_path: PathBuf,
    pub report_path: PathBuf,
    pub logs_path: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let run_root = ctx
        .run_dir
        .join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&run_root)?;

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        catalog_version: ctx.catalog_version.clone(),
        catalog: ctx.catalog.display().to_string(),
        options: ctx.options.clone(),
    };
    write_json(&run_root.join("config.json"), &config)?;

    let logs_path = run_root.join("logs.ndjson");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        fixtures_path: run_root.join("fixtures.json"),
        report_path: run_root.join("report.json"),
        logs_path,
    })
}

pub fn write_report(paths: &RunPaths, report: &GenerationReport) -> RegistryResult<()> {
    write_json(&paths.report_path, report)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_run_writes_config() {
        let run_dir = std::env::temp_dir().join(format!(
            "fixturemaker_registry_{}",
            uuid::Uuid::new_v4()
        ));
        let ctx = RunContext {
            run_id: "abc".to_string(),
            started_at: DateTime::parse_from_rfc3339("2024-05-01T10:20:30Z")
                .expect("timestamp")
                .with_timezone(&Utc),
            catalog_version: "0.1".to_string(),
            catalog: PathBuf::from("catalogs/blog.catalog.json"),
            run_dir: run_dir.clone(),
            options: RunOptions {
                use_all_fields: false,
                max_depth: None,
                strict: false,
                indent: 4,
                models: vec!["Post".to_string()],
            },
        };

        let paths = start_run(&ctx).expect("start run");
        let run_root = run_dir.join("2024-05-01T10-20-30Z__run_abc");
        assert_eq!(paths.fixtures_path, run_root.join("fixtures.json"));
        assert!(paths.logs_path.exists());

        let config: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(run_root.join("config.json")).expect("read config"),
        )
        .expect("parse config");
        assert_eq!(config["options"]["models"], serde_json::json!(["Post"]));
    }
}
