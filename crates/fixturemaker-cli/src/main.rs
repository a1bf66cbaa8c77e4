mod registry;
mod settings;

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use fixturemaker_core::{
    Error as CoreError, ModelCatalog, build_relation_graph_report, catalog_json_schema,
};
use fixturemaker_generate::{
    DEFAULT_INDENT, FieldDefaults, FixtureMaker, GenerationError, MakerOptions, to_json_string,
    write_fixtures,
};
use registry::{RunContext, RunOptions, init_logging, start_run, write_report};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Settings(#[from] settings::SettingsError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "fixturemaker",
    version,
    about = "Generate placeholder fixtures from a model catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build fixtures for one or more models and their related models.
    Generate(GenerateArgs),
    /// Validate a catalog and print its relation graph.
    Inspect(InspectArgs),
    /// Print the JSON Schema for catalog documents.
    CatalogSchema,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Model names (`Model` or `app_label.Model`).
    #[arg(value_name = "MODEL", required = true)]
    models: Vec<String>,
    /// Emit every field instead of only required ones.
    #[arg(short = 'a', long = "all", default_value_t = false)]
    all: bool,
    /// Write fixtures to this file instead of stdout.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<PathBuf>,
    /// Model catalog (.json or .toml).
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Settings file (defaults to ./fixturemaker.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Maximum relation hops followed from a requested model.
    #[arg(long)]
    max_depth: Option<usize>,
    /// Fail on unknown model names.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// JSON indentation width.
    #[arg(long)]
    indent: Option<usize>,
    /// Directory for run artifacts (config, fixtures, report, logs).
    #[arg(long)]
    run_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Model catalog (.json or .toml).
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Settings file (defaults to ./fixturemaker.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Inspect(args) => run_inspect(args),
        Command::CatalogSchema => {
            let schema = catalog_json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        models,
        all,
        file,
        catalog,
        config,
        max_depth,
        strict,
        indent,
        run_dir,
    } = args;

    let settings = settings::load_settings(config.as_deref())?;
    let catalog_path = catalog
        .or(settings.catalog.clone())
        .ok_or_else(missing_catalog)?;
    let indent = indent.or(settings.indent).unwrap_or(DEFAULT_INDENT);
    let options = MakerOptions {
        use_all_fields: all || settings.use_all_fields,
        max_depth: max_depth.or(settings.max_depth),
        strict: strict || settings.strict,
    };

    let run_paths = match run_dir {
        Some(run_dir) => {
            let run_id = Uuid::new_v4().to_string();
            let ctx = RunContext {
                run_id,
                started_at: chrono::Utc::now(),
                catalog_version: fixturemaker_core::CATALOG_VERSION.to_string(),
                catalog: catalog_path.clone(),
                run_dir,
                options: RunOptions {
                    use_all_fields: options.use_all_fields,
                    max_depth: options.max_depth,
                    strict: options.strict,
                    indent,
                    models: models.clone(),
                },
            };
            let paths = start_run(&ctx)?;
            init_logging(Some(&paths.logs_path))?;
            tracing::info!(event = "run_started", run_id = %ctx.run_id);
            Some(paths)
        }
        None => {
            init_logging(None)?;
            None
        }
    };

    let timer = Instant::now();

    let catalog = ModelCatalog::load(&catalog_path)?;
    tracing::info!(
        event = "catalog_loaded",
        path = %catalog_path.display(),
        apps = catalog.installed_apps.len()
    );

    let defaults = FieldDefaults::now().with_overrides(settings.defaults);
    let mut maker = FixtureMaker::new(&catalog, options).with_defaults(defaults);
    maker.build_fixtures(models.as_slice())?;

    match &file {
        Some(path) => {
            let bytes = write_fixtures(path, maker.records(), indent)?;
            tracing::info!(event = "fixtures_written", path = %path.display(), bytes);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", to_json_string(maker.records(), indent)?)?;
        }
    }

    if let Some(paths) = &run_paths {
        write_fixtures(&paths.fixtures_path, maker.records(), indent)?;
        write_report(paths, maker.report())?;
        tracing::info!(event = "report_written", path = %paths.report_path.display());
    }

    let duration_ms = timer.elapsed().as_millis() as u64;
    tracing::info!(
        event = "run_finished",
        status = "success",
        records = maker.records().len(),
        duration_ms
    );

    Ok(())
}

fn missing_catalog() -> CliError {
    CliError::InvalidConfig("a model catalog is required (--catalog)".to_string())
}

#[derive(Debug, Serialize)]
struct InspectSummary {
    catalog_version: String,
    apps: Vec<AppSummary>,
    relation_graph: fixturemaker_core::RelationGraphReport,
}

#[derive(Debug, Serialize)]
struct AppSummary {
    label: String,
    models: Vec<String>,
}

fn run_inspect(args: InspectArgs) -> Result<(), CliError> {
    init_logging(None)?;

    let settings = settings::load_settings(args.config.as_deref())?;
    let catalog_path = args
        .catalog
        .or(settings.catalog)
        .ok_or_else(missing_catalog)?;

    let catalog = ModelCatalog::load(&catalog_path)?;
    let relation_graph = build_relation_graph_report(&catalog);
    if let Some(cycle) = &relation_graph.cycle {
        tracing::warn!(event = "relation_cycle", models = ?cycle);
    }

    let summary = InspectSummary {
        catalog_version: catalog.catalog_version.clone(),
        apps: catalog
            .installed_apps
            .iter()
            .map(|app| AppSummary {
                label: app.label().to_string(),
                models: app.models.iter().map(|model| model.name.clone()).collect(),
            })
            .collect(),
        relation_graph,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_accepts_short_flags() {
        let cli = Cli::try_parse_from([
            "fixturemaker",
            "generate",
            "-a",
            "-f",
            "out.json",
            "--catalog",
            "catalogs/blog.catalog.json",
            "Post",
            "auth.User",
        ])
        .expect("parse args");

        let Command::Generate(args) = cli.command else {
            panic!("expected generate command");
        };
        assert!(args.all);
        assert_eq!(args.file, Some(PathBuf::from("out.json")));
        assert_eq!(args.models, vec!["Post", "auth.User"]);
    }

    #[test]
    fn generate_requires_a_model() {
        let result = Cli::try_parse_from(["fixturemaker", "generate", "--catalog", "c.json"]);
        assert!(result.is_err());
    }
}
