//! schemasight CLI - analyze a schema snapshot
//!
//! Usage:
//!   schemasight analyze <snapshot.json> [--output er|flowchart|doc|json|all] [--config <file>]
//!   schemasight table <snapshot.json> <table>
//!   schemasight list <snapshot.json>
//!   schemasight path <snapshot.json> <from> <to>
//!
//! Logging goes to stderr, filtered by `SCHEMASIGHT_LOG` (default `warn`).

use clap::{Parser, Subcommand, ValueEnum};
use schemasight::analysis::{analyze, AnalysisReport};
use schemasight::config::Settings;
use schemasight::metadata::{JsonSnapshotFile, SnapshotSource};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemasight")]
#[command(about = "schemasight - relationship inference, join advice and diagrams for relational schemas")]
#[command(version)]
struct Cli {
    /// Path to a settings file (defaults to the standard search locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a snapshot and print the rendered model
    Analyze {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "all")]
        output: OutputFormat,
    },

    /// Print the documentation section for one table
    Table {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        /// Table name (`schema.table` or a unique bare name)
        table: String,
    },

    /// List tables in render order
    List {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
    },

    /// Suggest the join chain between two tables
    Path {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        from: String,

        to: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Mermaid ER diagram
    Er,
    /// Mermaid flowchart
    Flowchart,
    /// Markdown documentation
    Doc,
    /// Machine-readable report
    Json,
    /// ER diagram, flowchart and documentation
    All,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SCHEMASIGHT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Analyze { snapshot, output } => {
            with_report(&snapshot, &settings, |report| cmd_analyze(report, output))
        }
        Commands::Table { snapshot, table } => {
            with_report(&snapshot, &settings, |report| cmd_table(report, &table))
        }
        Commands::List { snapshot } => with_report(&snapshot, &settings, cmd_list),
        Commands::Path { snapshot, from, to } => {
            with_report(&snapshot, &settings, |report| cmd_path(report, &from, &to))
        }
    }
}

/// Load the snapshot, analyze it, and hand the report to `f`.
fn with_report(
    path: &Path,
    settings: &Settings,
    f: impl FnOnce(&AnalysisReport) -> ExitCode,
) -> ExitCode {
    let snapshot = match JsonSnapshotFile::new(path).load_snapshot() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading snapshot '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match analyze(&snapshot, &settings.analysis_options()) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("warning: {}", diagnostic);
            }
            f(&report)
        }
        Err(e) => {
            eprintln!("Analysis error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_analyze(report: &AnalysisReport, output: OutputFormat) -> ExitCode {
    match output {
        OutputFormat::Er => print!("{}", report.rendered.er_diagram),
        OutputFormat::Flowchart => print!("{}", report.rendered.flowchart),
        OutputFormat::Doc => print!("{}", report.rendered.document),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::All => {
            println!("```mermaid");
            print!("{}", report.rendered.er_diagram);
            println!("```");
            println!();
            println!("```mermaid");
            print!("{}", report.rendered.flowchart);
            println!("```");
            println!();
            print!("{}", report.rendered.document);
        }
    }
    ExitCode::SUCCESS
}

fn cmd_table(report: &AnalysisReport, table: &str) -> ExitCode {
    match report.table_document(table) {
        Ok(doc) => {
            print!("{}", doc);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_list(report: &AnalysisReport) -> ExitCode {
    let tables = report.tables();
    if tables.is_empty() {
        println!("No tables in snapshot.");
        return ExitCode::SUCCESS;
    }

    println!("Tables:");
    for table in tables {
        let name = report.model.label(&table.name);
        let mut notes = Vec::new();
        if let Some(verdict) = report.junction(&table.name) {
            notes.push(if verdict.is_junction {
                format!("junction, {}", verdict.cardinality)
            } else {
                "relationship table with payload".to_string()
            });
        }
        if let Some(rows) = table.row_estimate {
            notes.push(format!("~{} rows", rows));
        }

        if notes.is_empty() {
            println!("  - {} ({} columns)", name, table.columns.len());
        } else {
            println!("  - {} ({} columns; {})", name, table.columns.len(), notes.join("; "));
        }
    }
    ExitCode::SUCCESS
}

fn cmd_path(report: &AnalysisReport, from: &str, to: &str) -> ExitCode {
    match report.join_path(from, to) {
        Ok(path) => {
            println!("{}", path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
