//! [`SqliteStore`]: the SQLite implementation of [`PlayStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use playtest_core::{
  play::{NewPlay, PlayRecord, next_timestamp},
  store::PlayStore,
};

use crate::{
  Result,
  encode::{RawPlay, column_text, decode_dt, encode_auxiliary, encode_dt, encode_list, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A play log backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a store that lives only as long as the connection.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PlayStore impl ──────────────────────────────────────────────────────────

impl PlayStore for SqliteStore {
  type Error = crate::Error;

  async fn append(&self, play: NewPlay) -> Result<PlayRecord> {
    let play_id        = Uuid::new_v4();
    let play_id_str    = encode_uuid(play_id);
    let player_count   = play.player_count.to_string();
    let profile        = play.profile.clone();
    let elements_json  = encode_list(&play.elements_used)?;
    let modules_json   = encode_list(&play.modules_on)?;
    let auxiliary_json = encode_auxiliary(&play.auxiliary)?;

    let recorded_at = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Clamp against the previous row so timestamps follow append order.
        let last: Option<String> = tx
          .query_row(
            "SELECT recorded_at FROM plays ORDER BY seq DESC LIMIT 1",
            [],
            |r| column_text(r, 0),
          )
          .optional()?
          .flatten();
        let recorded_at = next_timestamp(last.as_deref().and_then(decode_dt));

        tx.execute(
          "INSERT INTO plays (
             play_id, recorded_at, player_count, profile,
             elements_json, modules_json, auxiliary_json
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            play_id_str,
            encode_dt(recorded_at),
            player_count,
            profile,
            elements_json,
            modules_json,
            auxiliary_json,
          ],
        )?;
        tx.commit()?;
        Ok(recorded_at)
      })
      .await?;

    tracing::debug!(%play_id, player_count = play.player_count, "play appended");
    Ok(play.into_record(play_id, recorded_at))
  }

  async fn read_all(&self) -> Result<Vec<PlayRecord>> {
    let raws: Vec<RawPlay> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             seq, play_id, recorded_at, player_count, profile,
             elements_json, modules_json, auxiliary_json
           FROM plays
           ORDER BY seq ASC",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawPlay {
              seq:            row.get(0)?,
              play_id:        column_text(row, 1)?.unwrap_or_default(),
              recorded_at:    column_text(row, 2)?.unwrap_or_default(),
              player_count:   column_text(row, 3)?,
              profile:        column_text(row, 4)?,
              elements_json:  column_text(row, 5)?,
              modules_json:   column_text(row, 6)?,
              auxiliary_json: column_text(row, 7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawPlay::into_record).collect())
  }
}
