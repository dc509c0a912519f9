//! strata CLI: structure-aware semantic chunking.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use strata::builder::SemanticChunker;
use strata::chunk::chunks_to_json;
use strata::config::ChunkerConfig;
use strata::element::decode_elements;
use strata::table::{
    CategoricalSummary, ColumnStatistics, compute_categorical, compute_statistics, decompose,
    tables_in_html,
};

#[derive(Parser)]
#[command(name = "strata", version, about = "Structure-aware semantic chunking")]
struct Cli {
    /// TOML config file (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a JSON array of parsed elements.
    Chunk {
        /// Path to the element JSON file.
        #[arg(long)]
        input: PathBuf,

        /// Write chunks here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Spread table work across threads.
        #[arg(long)]
        parallel: bool,
    },

    /// Decompose every table in an HTML file and print its statistics.
    Tables {
        /// Path to the HTML file.
        #[arg(long)]
        html: PathBuf,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct TableReport {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    columns: Vec<ColumnReport>,
    row_count: usize,
    dropped_cells: usize,
    statistics: Vec<ColumnStatistics>,
    categorical: Vec<CategoricalSummary>,
}

#[derive(Serialize)]
struct ColumnReport {
    name: String,
    is_numeric: bool,
    numeric_ratio: f64,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ChunkerConfig::load(path)?,
        None => ChunkerConfig::default(),
    }
    .apply_env_overrides();

    match cli.command {
        Commands::Chunk {
            input,
            output,
            parallel,
        } => {
            let content = std::fs::read_to_string(&input).into_diagnostic()?;
            let elements = decode_elements(&content)?;
            let chunker = SemanticChunker::new(config)?;

            let chunks = if parallel {
                chunker.build_parallel(&elements)
            } else {
                chunker.build(&elements)
            };

            let summary = SemanticChunker::summarize(&chunks);
            tracing::info!(
                input = %input.display(),
                elements = elements.len(),
                chunks = summary.total(),
                prose = summary.prose,
                tables = summary.tables,
                empty_tables = summary.empty_tables,
                dropped_cells = summary.dropped_cells,
                "chunking complete"
            );

            let json = chunks_to_json(&chunks)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json).into_diagnostic()?;
                    println!("Wrote {} chunks to {}", chunks.len(), path.display());
                }
                None => println!("{json}"),
            }
        }

        Commands::Tables { html } => {
            config.validate()?;
            let content = std::fs::read_to_string(&html).into_diagnostic()?;
            let reports: Vec<TableReport> = tables_in_html(&content)
                .iter()
                .enumerate()
                .map(|(index, data)| {
                    let table = decompose(data);
                    let statistics = compute_statistics(&table, config.numeric_threshold);
                    let categorical = compute_categorical(&table, config.numeric_threshold);
                    TableReport {
                        index,
                        caption: data.caption.clone(),
                        columns: table
                            .columns
                            .iter()
                            .map(|c| ColumnReport {
                                name: c.name.clone(),
                                is_numeric: c.is_numeric,
                                numeric_ratio: c.numeric_ratio(),
                            })
                            .collect(),
                        row_count: table.row_count,
                        dropped_cells: table.dropped_cells,
                        statistics,
                        categorical,
                    }
                })
                .collect();

            tracing::info!(file = %html.display(), tables = reports.len(), "tables extracted");
            println!(
                "{}",
                serde_json::to_string_pretty(&reports).into_diagnostic()?
            );
        }

        Commands::Config { output } => {
            config.validate()?;
            let toml = config.to_toml()?;
            match output {
                Some(path) => {
                    config.save(&path)?;
                    println!("Wrote config to {}", path.display());
                }
                None => print!("{toml}"),
            }
        }
    }

    Ok(())
}
