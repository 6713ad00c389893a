//! Error type for `playtest-store-sqlite`.
//!
//! Every variant means the database could not be read or written. Malformed
//! fields inside individual rows are not errors; see `encode`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store unavailable: {0}")]
  StoreUnavailable(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
