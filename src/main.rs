use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iso_data_importer::app::fetch_use_case::{FetchAllResult, FetchUseCase, KindSummary};
use iso_data_importer::config::Config;
use iso_data_importer::exporter::Exporter;
use iso_data_importer::infra::http_client::ReqwestTransport;
use iso_data_importer::infra::source_cache::CachedSourceProvider;
use iso_data_importer::types::ExportStrategy;
use iso_data_importer::{logging, metrics};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "iso-data-importer")]
#[command(about = "Imports ISO open data and exports it as YAML")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured output directory
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every dataset, then export it as YAML
    Run {
        /// Re-download sources even when a cached copy exists
        #[arg(long)]
        force: bool,
        #[arg(long, value_enum, default_value_t = ExportStrategy::Collection)]
        strategy: ExportStrategy,
        /// Remove previous outputs of the chosen strategy before exporting
        #[arg(long)]
        clean: bool,
    },
    /// Fetch and parse every dataset without exporting
    Fetch {
        #[arg(long)]
        force: bool,
    },
    /// Remove exported files (both strategies unless one is given)
    Clean {
        #[arg(long, value_enum)]
        strategy: Option<ExportStrategy>,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path, true)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().context("loading config")?,
    };
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn fetch_all(config: &Config, force: bool) -> Result<FetchAllResult> {
    let transport = ReqwestTransport::new(config.timeout())?;
    let provider = CachedSourceProvider::new(transport, config.sources.clone(), &config.cache_dir);
    let use_case = FetchUseCase::with_default_sink(Box::new(provider));
    Ok(use_case.fetch_all(force))
}

fn print_summary(summaries: &[KindSummary]) {
    println!("\n📊 Import summary:");
    for summary in summaries {
        println!("   {}", summary);
    }
    let failed_kinds = summaries.iter().filter(|s| s.error.is_some()).count();
    if failed_kinds > 0 {
        warn!("{} dataset(s) could not be fetched", failed_kinds);
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();
    metrics::init_metrics();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let exporter = Exporter::new(&config.output_dir);

    match cli.command {
        Commands::Run {
            force,
            strategy,
            clean,
        } => {
            println!("🚀 Running ISO data import (strategy: {})...", strategy);
            let result = fetch_all(&config, force)?;

            exporter.prepare()?;
            if clean {
                let removed = exporter.clean(strategy)?;
                info!("Removed {} previous output file(s)", removed);
            }

            let written = exporter
                .export_deliverables(Some(&result.deliverables.collection), strategy)?
                + exporter.export_technical_committees(
                    Some(&result.technical_committees.collection),
                    strategy,
                )?
                + exporter.export_ics_entries(Some(&result.ics_entries.collection), strategy)?;

            print_summary(&result.summaries());
            println!(
                "✅ Wrote {} file(s) under {}",
                written,
                exporter.root().display()
            );
        }
        Commands::Fetch { force } => {
            println!("📥 Fetching ISO open data...");
            let result = fetch_all(&config, force)?;
            print_summary(&result.summaries());
        }
        Commands::Clean { strategy } => {
            let strategies = match strategy {
                Some(s) => vec![s],
                None => vec![ExportStrategy::Collection, ExportStrategy::IndividualFiles],
            };
            let mut removed = 0;
            for strategy in strategies {
                match exporter.clean(strategy) {
                    Ok(n) => removed += n,
                    Err(e) => {
                        error!("Cleaning {} outputs failed: {}", strategy, e);
                        return Err(e.into());
                    }
                }
            }
            println!("🧹 Removed {} file(s) from {}", removed, exporter.root().display());
        }
    }
    Ok(())
}
