//! schemascope CLI - Crawl database metadata into a catalog
//!
//! Usage:
//!   schemascope crawl <connection> [--config <file>] [--attributes <file>] [--infer] [--format <format>]
//!   schemascope queries <dialect>
//!
//! Examples:
//!   schemascope crawl dev --attributes attributes.toml --infer
//!   schemascope crawl dev --format json > catalog.json
//!   schemascope queries sqlite

use clap::{Parser, Subcommand, ValueEnum};
use schemascope::catalog::Catalog;
use schemascope::config::Settings;
use schemascope::diagnostics::{Diagnostics, Severity};
use schemascope::dialect::{Dialect, QueryTemplates};
use schemascope::retrieve::CrawlOutcome;
use schemascope::{load_from_settings, LoadError};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemascope")]
#[command(about = "schemascope - Crawl relational database metadata into a normalized catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a configured connection
    Crawl {
        /// Name of the connection in the config file
        connection: String,

        /// Config file (defaults to the standard search locations)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Attributes document to overlay (overrides crawl.attributes_file)
        #[arg(short, long)]
        attributes: Option<PathBuf>,

        /// Infer weak associations from column naming conventions
        #[arg(long)]
        infer: bool,

        /// Output format
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,
    },

    /// Print the built-in metadata queries for a dialect
    Queries {
        /// Dialect name (sqlite, oracle, information_schema)
        dialect: String,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Object counts and diagnostics
    Summary,
    /// The full catalog and diagnostics as JSON
    Json,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            connection,
            config,
            attributes,
            infer,
            format,
        } => cmd_crawl(connection, config, attributes, infer, format),
        Commands::Queries { dialect } => cmd_queries(&dialect),
    }
}

fn cmd_crawl(
    connection: String,
    config: Option<PathBuf>,
    attributes: Option<PathBuf>,
    infer: bool,
    format: OutputFormat,
) -> ExitCode {
    let settings = match config {
        Some(path) => Settings::from_file(&path),
        None => Settings::load(),
    };
    let mut settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = attributes {
        settings.crawl.attributes_file = Some(path.display().to_string());
    }
    if infer {
        settings.crawl.infer_weak_associations = true;
    }

    let outcome = match load_from_settings(&settings, &connection) {
        Ok(outcome) => outcome,
        Err(LoadError::Settings(e)) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
        Err(LoadError::Crawl(e)) => {
            eprintln!("Crawl failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match format {
        OutputFormat::Summary => print_summary(&connection, &outcome),
        OutputFormat::Json => {
            let report = JsonReport {
                catalog: &outcome.catalog,
                diagnostics: &outcome.diagnostics,
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing catalog: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    if outcome.diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    catalog: &'a Catalog,
    diagnostics: &'a Diagnostics,
}

fn print_summary(connection: &str, outcome: &CrawlOutcome) {
    let catalog = &outcome.catalog;

    println!("Catalog for connection '{}':", connection);
    println!();
    for schema in catalog.schemas() {
        let tables: Vec<_> = catalog.tables_in(&schema.name).collect();
        println!("  {} ({} tables)", schema.full_name(), tables.len());
        for table in tables {
            println!(
                "    {:<32} {:>3} columns  {:>2} indexes  {:>2} foreign keys  {:>2} weak associations",
                table.name(),
                table.columns().len(),
                table.indexes().len(),
                table.foreign_keys().count(),
                table.weak_associations().count(),
            );
        }
    }

    let routines = catalog.routines().count();
    if routines > 0 {
        println!();
        println!("  {} routines", routines);
    }

    let warnings = outcome
        .diagnostics
        .iter()
        .filter(|d| d.severity >= Severity::Warning)
        .collect::<Vec<_>>();
    if !warnings.is_empty() {
        println!();
        println!("Diagnostics:");
        for diagnostic in warnings {
            println!("  {}", diagnostic);
        }
    }
}

fn cmd_queries(dialect: &str) -> ExitCode {
    let dialect = match Dialect::from_str(dialect) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let templates = QueryTemplates::for_dialect(dialect);
    println!("-- {} metadata queries ({} templates)", dialect.name(), templates.len());
    for (key, sql) in templates.iter() {
        println!();
        println!("-- {}", key);
        println!("{};", sql.trim_end());
    }

    ExitCode::SUCCESS
}
