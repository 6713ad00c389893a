//! Server configuration and application assembly for the playtest tracker.
//!
//! Configuration is layered: an optional TOML file, then `PLAYTEST_*`
//! environment variables (`__` separates nested keys, e.g.
//! `PLAYTEST_STORE__BACKEND=memory`). Every field has a default, so the
//! server starts with no file at all.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use config::{Config, ConfigBuilder, ConfigError, Environment, builder::DefaultState};
use playtest_core::{catalog::{Catalog, CatalogConfig}, store::PlayStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub const ENV_PREFIX: &str = "PLAYTEST";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:    String,
  pub port:    u16,
  pub store:   StoreConfig,
  pub catalog: CatalogConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:    "127.0.0.1".to_string(),
      port:    8501,
      store:   StoreConfig::default(),
      catalog: CatalogConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
  #[default]
  Sqlite,
  Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  pub backend: StoreBackend,
  /// SQLite database file; ignored by the memory backend.
  pub path:    PathBuf,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self { backend: StoreBackend::Sqlite, path: PathBuf::from("playtest.sqlite3") }
  }
}

impl ServerConfig {
  /// Load from `path` (if it exists) overlaid with the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_builder(
      Config::builder().add_source(config::File::from(path).required(false)),
    )
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
    builder
      .add_source(
        Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

/// The full HTTP application: the API under `/api`, with request tracing.
pub fn app<S>(store: Arc<S>, catalog: Arc<Catalog>) -> Router
where
  S: PlayStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", playtest_api::api_router(store, catalog))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
  };
  use config::{File, FileFormat};
  use playtest_core::{catalog::WildcardCounting, store::MemoryStore};
  use tower::ServiceExt as _;

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    ServerConfig::from_builder(
      Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
    )
    .unwrap()
  }

  #[test]
  fn empty_file_uses_defaults() {
    let cfg = parse("");
    assert_eq!(cfg.address(), "127.0.0.1:8501");
    assert_eq!(cfg.store.backend, StoreBackend::Sqlite);
    assert_eq!(cfg.store.path, PathBuf::from("playtest.sqlite3"));
    assert_eq!(Catalog::try_from(cfg.catalog).unwrap(), Catalog::default());
  }

  #[test]
  fn file_overrides_store_and_catalog() {
    let cfg = parse(
      r#"
        port = 9000

        [store]
        backend = "memory"

        [catalog]
        elements          = ["Red", "Blue", "Green", "Joker"]
        wildcard          = "Joker"
        wildcard_counting = "included"

        [[catalog.recommended]]
        player_count = 2
        size         = 2
      "#,
    );
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store.backend, StoreBackend::Memory);

    let catalog = Catalog::try_from(cfg.catalog).unwrap();
    assert_eq!(catalog.universe(), ["Red", "Blue", "Green"]);
    assert_eq!(catalog.recommended_size(2), Some(2));
    assert_eq!(catalog.wildcard_counting(), WildcardCounting::Included);
    assert!(!catalog.has_profiles());
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/playtest.toml")).unwrap();
    assert_eq!(cfg.port, 8501);
  }

  #[test]
  fn tilde_expands_to_home() {
    assert_eq!(expand_tilde(Path::new("/abs/db")), PathBuf::from("/abs/db"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/db")), PathBuf::from(home).join("db"));
    }
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let app = app(Arc::new(MemoryStore::new()), Arc::new(Catalog::default()));

    let req = Request::builder().uri("/api/coverage").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(!rows.as_array().unwrap().is_empty());

    let req = Request::builder().uri("/coverage").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
