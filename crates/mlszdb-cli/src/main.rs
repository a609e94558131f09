//! `mlszdb`: load the MLSZ databank into a SQLite file.
//!
//! Every run drops and rebuilds the tables it owns. A run that fails part
//! way leaves whatever it wrote so far; rerun it from the start.
//!
//! # Usage
//!
//! ```
//! mlszdb --competition 17 --team 91
//! mlszdb --config mlszdb.toml --until matches
//! ```

mod http;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use mlszdb_crawl::{CrawlOrchestrator, Level, RetryingFetcher};
use mlszdb_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{http::HttpFetcher, settings::Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Load the MLSZ databank into SQLite")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "mlszdb.toml")]
  config: PathBuf,

  /// SQLite database to (re)build.
  #[arg(short, long)]
  database: Option<PathBuf>,

  /// Base URL of the databank interface scripts.
  #[arg(long)]
  base_url: Option<String>,

  /// Competition whose rounds are crawled.
  #[arg(long)]
  competition: Option<i64>,

  /// Team whose matches get details, players and events.
  #[arg(long)]
  team: Option<i64>,

  /// Requests in flight at once within a level.
  #[arg(long)]
  concurrency: Option<usize>,

  /// Retries per failed request.
  #[arg(long)]
  retries: Option<u32>,

  /// Stop after this level: seasons, competitions, matches, match-details,
  /// players.
  #[arg(long)]
  until: Option<Level>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli)?;

  let store = SqliteStore::open(&settings.database)
    .await
    .with_context(|| format!("failed to open database at {:?}", settings.database))?;
  let store = Arc::new(store);

  let fetcher = RetryingFetcher::new(HttpFetcher::new(&settings.http)?, settings.retry.policy());
  let crawl = CrawlOrchestrator::new(Arc::clone(&store), fetcher, settings.crawl);

  tracing::info!(database = ?settings.database, base_url = %settings.http.base_url, "starting crawl");
  let outcome = crawl.run_until(cli.until.unwrap_or(Level::Players)).await;
  drop(crawl);

  if let Ok(store) = Arc::try_unwrap(store) {
    store.close().await.context("failed to close database")?;
  }

  let report = outcome.context("crawl failed; tables written so far are incomplete")?;
  for (kind, rows) in &report.rows {
    tracing::info!(table = %kind, rows, "loaded");
  }
  let elapsed = report
    .finished_at
    .map(|end| (end - report.started_at).num_milliseconds())
    .unwrap_or_default();
  tracing::info!(fetches = report.fetches, elapsed_ms = elapsed, "crawl finished");

  Ok(())
}
