//! ETag computation for report responses.
//!
//! Reports are pure functions of the catalog and the play log, so a
//! fingerprint of both identifies a report body. The fingerprint covers the
//! serialised catalog, then every play id and timestamp in append order.

use axum::{
  Json,
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use playtest_core::{catalog::Catalog, play::PlayRecord};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute a quoted strong ETag over the catalog and the log snapshot.
pub fn compute_etag(catalog: &Catalog, records: &[PlayRecord]) -> String {
  let mut hasher = Sha256::new();
  if let Ok(bytes) = serde_json::to_vec(catalog) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(&bytes);
  }
  hasher.update((records.len() as u64).to_le_bytes());
  for r in records {
    hasher.update(r.play_id.as_bytes());
    hasher.update(r.recorded_at.timestamp_micros().to_le_bytes());
  }
  format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// Whether `If-None-Match` already names `etag`. Accepts `*`, lists, and
/// unquoted tags.
pub fn not_modified(headers: &HeaderMap, etag: &str) -> bool {
  let Some(value) = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
  else {
    return false;
  };
  let bare = etag.trim_matches('"');
  value
    .split(',')
    .map(|t| t.trim().trim_start_matches("W/").trim_matches('"'))
    .any(|t| t == "*" || t == bare)
}

/// `304 Not Modified` when the client already has this snapshot, otherwise
/// the JSON body built by `body`. Both carry the ETag.
pub fn conditional_json<T, F>(headers: &HeaderMap, etag: &str, body: F) -> Response
where
  T: Serialize,
  F: FnOnce() -> T,
{
  let mut resp = if not_modified(headers, etag) {
    StatusCode::NOT_MODIFIED.into_response()
  } else {
    Json(body()).into_response()
  };
  if let Ok(v) = HeaderValue::from_str(etag) {
    resp.headers_mut().insert(header::ETAG, v);
  }
  resp
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use playtest_core::{
    catalog::{CatalogConfig, RecommendedSize, WildcardCounting},
    play::NewPlay,
  };
  use uuid::Uuid;

  use super::*;

  fn record(secs: i64) -> PlayRecord {
    NewPlay::new(2, ["Fog"])
      .into_record(Uuid::from_u128(secs as u128), Utc.timestamp_opt(secs, 0).unwrap())
  }

  #[test]
  fn appending_changes_etag() {
    let c = Catalog::default();
    let a = vec![record(1)];
    let b = vec![record(1), record(2)];
    assert_ne!(compute_etag(&c, &a), compute_etag(&c, &b));
    assert_eq!(compute_etag(&c, &a), compute_etag(&c, &[record(1)]));
  }

  #[test]
  fn catalog_change_changes_etag() {
    let other = Catalog::try_from(CatalogConfig {
      elements:          vec!["Fog".into(), "Crew".into()],
      wildcard:          None,
      recommended:       vec![RecommendedSize { player_count: 2, size: 1 }],
      profiles:          vec![],
      modules:           vec![],
      wildcard_counting: WildcardCounting::Excluded,
    })
    .unwrap();
    let log = vec![record(1)];
    assert_ne!(compute_etag(&Catalog::default(), &log), compute_etag(&other, &log));
    assert_ne!(compute_etag(&Catalog::default(), &[]), compute_etag(&other, &[]));
  }

  #[test]
  fn if_none_match_forms() {
    let etag = compute_etag(&Catalog::default(), &[]);
    let mut h = HeaderMap::new();
    assert!(!not_modified(&h, &etag));

    h.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&etag).unwrap());
    assert!(not_modified(&h, &etag));

    let bare = etag.trim_matches('"').to_owned();
    h.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&format!("\"x\", {bare}")).unwrap());
    assert!(not_modified(&h, &etag));

    h.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"stale\""));
    assert!(!not_modified(&h, &etag));
  }
}
