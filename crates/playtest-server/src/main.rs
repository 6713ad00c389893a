//! playtest-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), validates the
//! catalog, opens the configured play store, and serves the JSON API under
//! `/api`.
//!
//! # Checking a configuration
//!
//! ```
//! cargo run -p playtest-server -- --config playtest.toml --check
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use playtest_core::{
  catalog::Catalog,
  combination::enumerate_recommended,
  store::{MemoryStore, PlayStore},
};
use playtest_server::{ServerConfig, StoreBackend, expand_tilde};
use playtest_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Playtest coverage tracker server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Validate the configuration, print the catalog summary, and exit.
  #[arg(long)]
  check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let catalog = Catalog::try_from(server_cfg.catalog.clone()).context("invalid catalog")?;
  let combinations = enumerate_recommended(&catalog).len();
  tracing::info!(
    elements = catalog.elements().len(),
    wildcard = ?catalog.wildcard(),
    profiles = catalog.profiles().len(),
    combinations,
    "catalog loaded"
  );

  if cli.check {
    println!(
      "catalog ok: {} elements, {} player counts, {} recommended combinations",
      catalog.elements().len(),
      catalog.player_counts().count(),
      combinations
    );
    return Ok(());
  }

  let catalog = Arc::new(catalog);
  match server_cfg.store.backend {
    StoreBackend::Sqlite => {
      let store_path = expand_tilde(&server_cfg.store.path);
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      tracing::info!(path = ?store_path, "using sqlite play store");
      serve(&server_cfg, Arc::new(store), catalog).await
    }
    StoreBackend::Memory => {
      tracing::warn!("using in-memory play store; plays are lost on exit");
      serve(&server_cfg, Arc::new(MemoryStore::new()), catalog).await
    }
  }
}

async fn serve<S>(cfg: &ServerConfig, store: Arc<S>, catalog: Arc<Catalog>) -> anyhow::Result<()>
where
  S: PlayStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let app = playtest_server::app(store, catalog);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
