//! `ghg` command line interface.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ghg_core::{
    candidate, flatten, CompanyGraph, ExtractionValidator, IntegratedGraph, SheetRow,
    ValidatorConfig, Violation,
};

#[derive(Parser, Debug)]
#[command(name = "ghg", version, about = "Validate and export GHG disclosure extraction results")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate extraction results
    Validate {
        /// Candidate files (.json, .yaml or .yml)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Validator configuration (YAML, or JSON by extension)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the extraction result JSON Schema
    Schema,

    /// Write accepted results as CSV rows
    Flatten {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Merge company relationship graphs
    Graph {
        /// Graph documents, each one company graph or a list of them
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print only aggregate statistics
        #[arg(long)]
        summary: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    valid: bool,
    violations: &'a [Violation],
}

#[derive(Serialize)]
struct Report<'a> {
    checked_at: DateTime<Utc>,
    files: Vec<FileReport<'a>>,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_validator(config: Option<&Path>) -> Result<ExtractionValidator> {
    let config = match config {
        Some(path) => ValidatorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ValidatorConfig::default(),
    };
    Ok(ExtractionValidator::with_config(config))
}

fn load_candidate(path: &Path) -> Result<serde_json::Value> {
    candidate::from_file(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run_validate(files: &[PathBuf], format: Format, config: Option<&Path>) -> Result<bool> {
    let validator = load_validator(config)?;

    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        let candidate = load_candidate(path)?;
        let violations = match validator.validate(&candidate) {
            Ok(_) => Vec::new(),
            Err(report) => report.violations().to_vec(),
        };
        tracing::info!(path = %path.display(), violations = violations.len(), "Validated");
        outcomes.push((path, violations));
    }

    let all_valid = outcomes.iter().all(|(_, v)| v.is_empty());
    let mut stdout = io::stdout().lock();

    match format {
        Format::Text => {
            for (path, violations) in &outcomes {
                if violations.is_empty() {
                    writeln!(stdout, "OK    {}", path.display())?;
                } else {
                    writeln!(stdout, "FAIL  {} ({} violation(s))", path.display(), violations.len())?;
                    for violation in violations {
                        writeln!(stdout, "      {}", violation)?;
                    }
                }
            }
        }
        Format::Json => {
            let report = Report {
                checked_at: Utc::now(),
                files: outcomes
                    .iter()
                    .map(|(path, violations)| FileReport {
                        path: path.display().to_string(),
                        valid: violations.is_empty(),
                        violations,
                    })
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(stdout)?;
        }
    }

    Ok(all_valid)
}

fn run_schema() -> Result<()> {
    let schema = ghg_core::extraction_schema()?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn write_rows<W: Write>(writer: W, rows: &[SheetRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn run_flatten(files: &[PathBuf], output: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let validator = load_validator(config)?;

    let mut rows = Vec::new();
    for path in files {
        let candidate = load_candidate(path)?;
        match validator.validate(&candidate) {
            Ok(validated) => rows.extend(flatten(&validated)),
            Err(report) => {
                tracing::warn!(
                    path = %path.display(),
                    violations = report.violations().len(),
                    "Skipping invalid extraction result"
                );
            }
        }
    }

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_rows(file, &rows)?;
            tracing::info!(path = %path.display(), rows = rows.len(), "Wrote CSV");
        }
        None => write_rows(io::stdout().lock(), &rows)?,
    }

    Ok(())
}

fn run_graph(files: &[PathBuf], summary: bool) -> Result<()> {
    let mut graph = IntegratedGraph::new();

    for path in files {
        let value = load_candidate(path)?;
        let companies: Vec<CompanyGraph> = if value.is_array() {
            serde_json::from_value::<Vec<CompanyGraph>>(value)
        } else {
            serde_json::from_value::<CompanyGraph>(value).map(|company| vec![company])
        }
        .with_context(|| format!("Invalid graph document {}", path.display()))?;

        for company in &companies {
            graph.add_company(company);
        }
    }

    let rendered = if summary {
        serde_json::to_string_pretty(&graph.summary())?
    } else {
        serde_json::to_string_pretty(&serde_json::json!({
            "clusters": graph.clusters(),
            "edges": graph.edges(),
        }))?
    };
    println!("{}", rendered);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Validate {
            files,
            format,
            config,
        } => run_validate(files, *format, config.as_deref()),
        Command::Schema => run_schema().map(|_| true),
        Command::Flatten {
            files,
            output,
            config,
        } => run_flatten(files, output.as_deref(), config.as_deref()).map(|_| true),
        Command::Graph { files, summary } => run_graph(files, *summary).map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
