//! Error types for `playtest-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The backing medium of a play store could not be read or written.
  #[error("store unavailable: {0}")]
  StoreUnavailable(String),

  #[error("invalid catalog: {0}")]
  InvalidCatalog(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
