//! JSON REST API for the playtest tracker.
//!
//! Exposes an axum [`Router`] backed by any
//! [`playtest_core::store::PlayStore`] and a loaded
//! [`playtest_core::catalog::Catalog`]. Every report is recomputed from the
//! full play log on each request. Transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", playtest_api::api_router(store.clone(), catalog.clone()))
//! ```

pub mod error;
pub mod etag;
pub mod plays;
pub mod reports;

use std::sync::Arc;

use axum::{Router, routing::get};
use playtest_core::{catalog::Catalog, play::PlayRecord, store::PlayStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub catalog: Arc<Catalog>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), catalog: Arc::clone(&self.catalog) }
  }
}

impl<S> ApiState<S>
where
  S: PlayStore,
{
  /// Read the whole log; the only fallible step of every report.
  pub async fn snapshot(&self) -> Result<Vec<PlayRecord>, ApiError> {
    self.store.read_all().await.map_err(ApiError::store)
  }
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, catalog: Arc<Catalog>) -> Router<()>
where
  S: PlayStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/catalog", get(reports::catalog::<S>))
    // Play log
    .route("/plays", get(plays::list::<S>).post(plays::create::<S>))
    // Reports
    .route("/coverage", get(reports::coverage::<S>))
    .route("/gaps", get(reports::gaps::<S>))
    .route("/gaps/suggestion", get(reports::suggestion::<S>))
    .route("/observed", get(reports::observed::<S>))
    .route("/density", get(reports::density::<S>))
    .route("/stats", get(reports::stats::<S>))
    .with_state(ApiState { store, catalog })
}
