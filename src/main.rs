use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use logistics_dashboard::{
    analysis::{catalog, AnalysisKind, Analyzer},
    config::DashboardConfig,
    dashboard::{Dashboard, LoadState},
    io::{self, TableReader},
    models::Table,
    visualization::{format_table_artifact, print_catalog, print_page},
    DashboardError,
};

#[derive(Parser)]
#[command(
    name = "logistics-dashboard",
    about = "Logistics Data Analysis Dashboard - descriptive analyses over delivery records",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a CSV file and run the selected analyses
    Analyze {
        /// Path to input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Analysis to run, by catalog name; repeat to run several in order
        #[arg(short, long = "analysis")]
        analyses: Vec<String>,

        /// Run every analysis in catalog order
        #[arg(long, conflicts_with = "analyses")]
        all: bool,

        /// Print the rendered page as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available analyses and the columns they need
    Catalog,

    /// Display a quick summary of a CSV file
    Summary {
        /// Path to input CSV file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Start the web UI server
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind, overriding the configuration file
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on, overriding the configuration file
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Commands {
    fn default_log_level(&self) -> &'static str {
        match self {
            #[cfg(feature = "web")]
            Commands::Serve { .. } => "info",
            _ => "warn",
        }
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read a CSV after checking that it exists and has a supported extension.
fn load_input(path: &Path) -> Result<std::result::Result<Table, DashboardError>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    let reader = io::reader_for(path)?;
    Ok(reader.read(path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.default_log_level());

    let config = DashboardConfig::load(cli.config.as_deref())
        .with_context(|| "failed to load configuration")?;

    match cli.command {
        Commands::Analyze {
            input,
            analyses,
            all,
            json,
        } => {
            let selections = if all {
                AnalysisKind::ALL.to_vec()
            } else {
                AnalysisKind::parse_selection(&analyses)?
            };

            let load = LoadState::from_result(load_input(&input)?.map(Arc::new));
            let page = Dashboard::new(config).render(&load, &selections);

            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print_page(&page);
            }
        }

        Commands::Catalog => {
            print_catalog(&catalog());
        }

        Commands::Summary { input } => {
            let table = load_input(&input)?
                .with_context(|| format!("failed to load {}", input.display()))?;
            let analyzer = Analyzer::with_config(&table, &config);

            println!("\n{}", "Quick Summary".bold().cyan());
            println!("{}", "=".repeat(40));
            println!("  Name:           {}", table.name());
            println!("  Records:        {}", table.num_rows());
            println!("  Columns:        {}", table.num_columns());
            println!("  Numeric:        {}", table.numeric_columns().count());
            println!(
                "  Analyses ready: {}/{}",
                AnalysisKind::ALL
                    .iter()
                    .filter(|k| k.missing_columns(&table).is_empty())
                    .count(),
                AnalysisKind::ALL.len()
            );
            print!("{}", format_table_artifact(&analyzer.schema_table()));
        }

        #[cfg(feature = "web")]
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(logistics_dashboard::web::start_server(config))?;
        }
    }

    Ok(())
}
