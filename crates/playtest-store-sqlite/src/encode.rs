//! Encoding and decoding between play records and SQLite column text.
//!
//! Encoding is strict. Decoding is total: a row always becomes a
//! [`PlayRecord`], with any unreadable field replaced by its empty value and
//! a warning logged. One corrupt row must never fail a full read.

use chrono::{DateTime, Utc};
use playtest_core::play::{Auxiliary, PlayRecord};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s.trim())
    .map(|dt| dt.with_timezone(&Utc))
    .ok()
}

// ─── Lists and auxiliary ─────────────────────────────────────────────────────

pub fn encode_list(names: &[String]) -> Result<String> {
  Ok(serde_json::to_string(names)?)
}

pub fn encode_auxiliary(aux: &Auxiliary) -> Result<String> {
  Ok(serde_json::to_string(aux)?)
}

/// A JSON array of strings. Missing, blank, or corrupt text decodes to `None`.
pub fn decode_list(s: Option<&str>) -> Option<Vec<String>> {
  let s = s?.trim();
  if s.is_empty() {
    return Some(Vec::new());
  }
  serde_json::from_str(s).ok()
}

pub fn decode_auxiliary(s: Option<&str>) -> Option<Auxiliary> {
  let s = s?.trim();
  if s.is_empty() {
    return Some(Auxiliary::default());
  }
  serde_json::from_str(s).ok()
}

// ─── Player count ────────────────────────────────────────────────────────────

/// A positive integer, also accepted in float form (`"4.0"`) as spreadsheet
/// exports write it. Anything else is `None`.
pub fn decode_player_count(s: &str) -> Option<u32> {
  let s = s.trim();
  let n = s.parse::<u32>().ok().or_else(|| {
    let f = s.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
  })?;
  (n > 0).then_some(n)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Read any column as text. Numbers are formatted; NULL is `None`.
pub fn column_text(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
  use rusqlite::types::ValueRef;

  Ok(match row.get_ref(idx)? {
    ValueRef::Null => None,
    ValueRef::Integer(i) => Some(i.to_string()),
    ValueRef::Real(f) => Some(f.to_string()),
    ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
  })
}

/// Raw column values read directly from a `plays` row.
pub struct RawPlay {
  pub seq:            i64,
  pub play_id:        String,
  pub recorded_at:    String,
  pub player_count:   Option<String>,
  pub profile:        Option<String>,
  pub elements_json:  Option<String>,
  pub modules_json:   Option<String>,
  pub auxiliary_json: Option<String>,
}

impl RawPlay {
  pub fn into_record(self) -> PlayRecord {
    let seq = self.seq;

    let play_id = Uuid::parse_str(self.play_id.trim()).unwrap_or_else(|_| {
      tracing::warn!(seq, play_id = %self.play_id, "malformed play id; using nil");
      Uuid::nil()
    });

    let recorded_at = decode_dt(&self.recorded_at).unwrap_or_else(|| {
      tracing::warn!(seq, %play_id, recorded_at = %self.recorded_at, "malformed timestamp; using epoch");
      DateTime::<Utc>::UNIX_EPOCH
    });

    let player_count = match self.player_count.as_deref() {
      None => None,
      Some(raw) => {
        let pc = decode_player_count(raw);
        if pc.is_none() {
          tracing::warn!(seq, %play_id, player_count = raw, "malformed player count");
        }
        pc
      }
    };

    let elements_used = decode_list(self.elements_json.as_deref()).unwrap_or_else(|| {
      if self.elements_json.is_some() {
        tracing::warn!(seq, %play_id, "malformed elements list; treating as empty");
      }
      Vec::new()
    });

    let modules_on = decode_list(self.modules_json.as_deref()).unwrap_or_else(|| {
      if self.modules_json.is_some() {
        tracing::warn!(seq, %play_id, "malformed modules list; treating as empty");
      }
      Vec::new()
    });

    let auxiliary = decode_auxiliary(self.auxiliary_json.as_deref()).unwrap_or_else(|| {
      if self.auxiliary_json.is_some() {
        tracing::warn!(seq, %play_id, "malformed auxiliary fields; using defaults");
      }
      Auxiliary::default()
    });

    let profile = self
      .profile
      .map(|p| p.trim().to_owned())
      .filter(|p| !p.is_empty());

    PlayRecord {
      play_id,
      recorded_at,
      player_count,
      profile,
      elements_used,
      modules_on,
      auxiliary,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn player_count_forms() {
    assert_eq!(decode_player_count("4"), Some(4));
    assert_eq!(decode_player_count(" 3 "), Some(3));
    assert_eq!(decode_player_count("5.0"), Some(5));
    assert_eq!(decode_player_count("0"), None);
    assert_eq!(decode_player_count("2.5"), None);
    assert_eq!(decode_player_count("-1"), None);
    assert_eq!(decode_player_count("four"), None);
    assert_eq!(decode_player_count(""), None);
  }

  #[test]
  fn list_decoding_is_tolerant() {
    assert_eq!(decode_list(Some(r#"["Fog","Crew"]"#)), Some(vec!["Fog".into(), "Crew".into()]));
    assert_eq!(decode_list(Some("  ")), Some(vec![]));
    assert_eq!(decode_list(Some("[\"Fog\"")), None);
    assert_eq!(decode_list(Some("{}")), None);
    assert_eq!(decode_list(None), None);
  }

  #[test]
  fn malformed_row_still_decodes() {
    let raw = RawPlay {
      seq:            7,
      play_id:        "not-a-uuid".into(),
      recorded_at:    "yesterday".into(),
      player_count:   Some("lots".into()),
      profile:        Some("  ".into()),
      elements_json:  Some("[broken".into()),
      modules_json:   None,
      auxiliary_json: Some("{\"winner\":".into()),
    };
    let rec = raw.into_record();
    assert_eq!(rec.play_id, Uuid::nil());
    assert_eq!(rec.recorded_at, DateTime::<Utc>::UNIX_EPOCH);
    assert_eq!(rec.player_count, None);
    assert_eq!(rec.profile, None);
    assert!(rec.elements_used.is_empty());
    assert!(rec.modules_on.is_empty());
    assert_eq!(rec.auxiliary, Auxiliary::default());
  }

  #[test]
  fn timestamp_roundtrip() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)), Some(now));
  }
}
