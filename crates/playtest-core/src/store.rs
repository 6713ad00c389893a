//! The `PlayStore` trait and the in-process [`MemoryStore`].
//!
//! The trait is implemented by storage backends (e.g.
//! `playtest-store-sqlite`). Higher layers depend on this abstraction, not on
//! any concrete backend.

use std::{
  future::Future,
  sync::{Arc, RwLock},
};

use uuid::Uuid;

use crate::{
  Error, Result,
  play::{NewPlay, PlayRecord, next_timestamp},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// An append-only, ordered log of play records.
///
/// Records are never updated, reordered, or deleted. `read_all` returns them
/// in append order as a consistent snapshot; an empty log is an empty `Vec`,
/// not an error. Both operations take time proportional to the number of
/// records at most.
pub trait PlayStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append one play. The store assigns `play_id` and `recorded_at`.
  fn append(
    &self,
    play: NewPlay,
  ) -> impl Future<Output = Result<PlayRecord, Self::Error>> + Send + '_;

  /// Every record, in append order.
  fn read_all(
    &self,
  ) -> impl Future<Output = Result<Vec<PlayRecord>, Self::Error>> + Send + '_;
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

/// A volatile store that lives as long as the process.
///
/// Clones share the same log.
#[derive(Clone, Default)]
pub struct MemoryStore {
  plays: Arc<RwLock<Vec<PlayRecord>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn append_sync(&self, play: NewPlay) -> Result<PlayRecord> {
    let mut plays = self.plays.write().map_err(|_| poisoned())?;
    let recorded_at = next_timestamp(plays.last().map(|p| p.recorded_at));
    let record = play.into_record(Uuid::new_v4(), recorded_at);
    plays.push(record.clone());
    Ok(record)
  }

  fn read_all_sync(&self) -> Result<Vec<PlayRecord>> {
    let plays = self.plays.read().map_err(|_| poisoned())?;
    Ok(plays.clone())
  }
}

fn poisoned() -> Error {
  Error::StoreUnavailable("in-memory play log lock poisoned".into())
}

impl PlayStore for MemoryStore {
  type Error = Error;

  async fn append(&self, play: NewPlay) -> Result<PlayRecord> { self.append_sync(play) }

  async fn read_all(&self) -> Result<Vec<PlayRecord>> { self.read_all_sync() }
}
