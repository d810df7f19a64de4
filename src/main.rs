use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use villes_scraper::app::build_dataset_use_case::BuildDatasetUseCase;
use villes_scraper::app::seed_store_use_case::{seed_store, SeedOutcome};
use villes_scraper::config::Config;
use villes_scraper::storage::{CityRepository, SqliteCityRepository};
use villes_scraper::{logging, metrics, server};

#[derive(Parser)]
#[command(name = "villes_scraper")]
#[command(about = "Rent index enrichment and city search API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich the rent index and write the dataset file
    Build {
        /// Rent index CSV (defaults to the configured one)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Dataset file to write (defaults to <resources>/results.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load the dataset into the store and serve the search API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Build the dataset, then serve it
    Run {
        #[arg(long)]
        port: Option<u16>,
    },
}

async fn build(config: &Config, input: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config {
        rent_index_path: input.unwrap_or_else(|| config.rent_index_path.clone()),
        ..config.clone()
    };
    let mut use_case = BuildDatasetUseCase::from_config(&config)?;
    if let Some(output) = output {
        use_case = use_case.with_dataset_path(output);
    }

    info!(input = %config.rent_index_path.display(), "Building dataset");
    let report = use_case.execute().await?;

    println!("\n📊 Enrichment results:");
    println!("   Cities kept: {}", report.cities.len());
    println!("   Skipped (geo lookup failed): {}", report.skipped.len());
    println!("   Without rating: {}", report.ratings_missing);
    println!("   Duration: {:?}", report.elapsed);
    println!("   Output file: {}", use_case.dataset_path().display());

    if !report.skipped.is_empty() {
        warn!("{} cities skipped during enrichment", report.skipped.len());
    }
    Ok(())
}

async fn serve(config: &Config, port: Option<u16>) -> anyhow::Result<()> {
    let repo = Arc::new(SqliteCityRepository::open(&config.database_url)?);

    match seed_store(repo.as_ref(), &config.dataset_path()) {
        Ok(SeedOutcome::Inserted(count)) => info!("Loaded {} cities into the store", count),
        Ok(SeedOutcome::AlreadyLoaded) => info!("Store already loaded, {} cities", repo.count()?),
        Err(e) => {
            error!("Unable to load the dataset: {}", e);
            return Err(e.into());
        }
    }

    let repo: Arc<dyn CityRepository> = repo;
    server::start_server(repo, &config.host, port.unwrap_or(config.port)).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    logging::init_logging(&config.log_dir);
    metrics::init_metrics(config.metrics_addr.as_deref());

    match cli.command {
        Commands::Build { input, output } => {
            println!("🔄 Building the city dataset...");
            build(&config, input, output).await?;
        }
        Commands::Serve { port } => {
            serve(&config, port).await?;
        }
        Commands::Run { port } => {
            println!("🚀 Building the dataset, then serving it...");
            build(&config, None, None).await?;
            serve(&config, port).await?;
        }
    }
    Ok(())
}
