use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

mod config;
mod db;
mod error;
mod gdelt;
mod ingest;
mod models;
mod sentiment;

use config::Config;
use db::SqliteStore;
use gdelt::{build_client, ArchiveFetcher, RemoteCatalog};
use ingest::Ingestor;

/// Ingest GDELT event archives into the news article store.
#[derive(Debug, Parser)]
#[command(name = "gdelt-ingest", version, about)]
struct Cli {
    /// Number of days to look back from now
    #[arg(long)]
    days: Option<u32>,

    /// SQLite database path (overrides the config file)
    #[arg(long, env = "DATABASE_PATH")]
    db: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Master file list URL (overrides the config file)
    #[arg(long)]
    master_list: Option<String>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(url) = cli.master_list {
        config.master_list_url = url;
    }
    let days = cli.days.unwrap_or(config.lookback_days);

    let client = build_client(&config)?;
    let store = Arc::new(SqliteStore::new(&config.db_path).await?);
    let ingestor = Ingestor::new(
        Arc::new(RemoteCatalog::new(
            client.clone(),
            &config.master_list_url,
            &config.archive_suffix,
        )),
        Arc::new(ArchiveFetcher::new(client)),
        store.clone(),
    );

    tracing::info!(days, db = %config.db_path, "Processing GDELT data");
    let report = ingestor.run_lookback(days).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Processed {} files ({} failed), added {} articles; store now holds {}",
            report.files_seen,
            report.files_failed,
            report.articles_added,
            store.count().await?
        );
    }

    Ok(())
}
