//! Play records, one per logged play session.
//!
//! A play record is immutable once appended. The store assigns its id and
//! timestamp; callers supply a [`NewPlay`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Auxiliary fields ────────────────────────────────────────────────────────

/// One player's result in a logged play.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerScore {
  pub name:  String,
  pub score: Option<i64>,
}

/// Free-form session details. Opaque to coverage; carried through unchanged.
///
/// Every field defaults when absent, and fields this version does not know
/// about are kept in `extra`, so rows written by older or newer versions of
/// the tracker still decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Auxiliary {
  pub winner:     Option<String>,
  pub notes:      Option<String>,
  /// Whether this was anyone's first play of the game.
  pub first_play: bool,
  pub players:    Vec<PlayerScore>,
  #[serde(flatten)]
  pub extra:      serde_json::Map<String, serde_json::Value>,
}

// ─── PlayRecord ──────────────────────────────────────────────────────────────

/// A stored play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
  pub play_id:       Uuid,
  /// Store-assigned; never earlier than the previous record's timestamp.
  pub recorded_at:   DateTime<Utc>,
  /// `None` when the stored value was missing or not a number. Such records
  /// never match a combination.
  pub player_count:  Option<u32>,
  pub profile:       Option<String>,
  pub elements_used: Vec<String>,
  pub modules_on:    Vec<String>,
  #[serde(default)]
  pub auxiliary:     Auxiliary,
}

// ─── NewPlay ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::PlayStore::append`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlay {
  pub player_count:  u32,
  #[serde(default)]
  pub profile:       Option<String>,
  #[serde(default)]
  pub elements_used: Vec<String>,
  #[serde(default)]
  pub modules_on:    Vec<String>,
  #[serde(default)]
  pub auxiliary:     Auxiliary,
}

impl NewPlay {
  /// Convenience constructor with every optional field left empty.
  pub fn new<I, S>(player_count: u32, elements_used: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      player_count,
      profile: None,
      elements_used: elements_used.into_iter().map(Into::into).collect(),
      modules_on: Vec::new(),
      auxiliary: Auxiliary::default(),
    }
  }

  pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
    self.profile = Some(profile.into());
    self
  }

  /// Stamp the input with its store-assigned identity.
  pub fn into_record(self, play_id: Uuid, recorded_at: DateTime<Utc>) -> PlayRecord {
    PlayRecord {
      play_id,
      recorded_at,
      player_count: Some(self.player_count),
      profile: self.profile,
      elements_used: self.elements_used,
      modules_on: self.modules_on,
      auxiliary: self.auxiliary,
    }
  }
}

/// The timestamp for the next append: now, unless the clock has moved behind
/// the last record.
pub fn next_timestamp(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
  let now = Utc::now();
  last.map_or(now, |last| now.max(last))
}
