//! Handlers for `/plays` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/plays` | Optional `?limit=N` returns the N most recent plays |
//! | `POST` | `/plays` | Body: [`NewPlay`]; returns 201 + stored record |
//!
//! `POST` is the submission-validation layer: the player count, profile,
//! elements and modules must all come from the catalog, and are stored in
//! the catalog's spelling. The stores themselves accept anything.

use axum::{
  Json,
  extract::{Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use playtest_core::{
  canonical::canonicalize,
  catalog::Catalog,
  play::{NewPlay, PlayRecord},
  stats::recent,
  store::PlayStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, etag};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Return only the most recent `limit` plays.
  pub limit: Option<usize>,
}

/// `GET /plays[?limit=N]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PlayStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = state.snapshot().await?;
  let tag = etag::compute_etag(&state.catalog, &records);
  Ok(etag::conditional_json(&headers, &tag, || match params.limit {
    Some(n) => recent(&records, n).to_vec(),
    None => records.clone(),
  }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Check `play` against the catalog and normalise its name lists.
pub fn validate(catalog: &Catalog, mut play: NewPlay) -> Result<NewPlay, ApiError> {
  if catalog.recommended_size(play.player_count).is_none() {
    let known: Vec<String> = catalog.player_counts().map(|p| p.to_string()).collect();
    return Err(ApiError::BadRequest(format!(
      "player count {} is not one of {}",
      play.player_count,
      known.join(", ")
    )));
  }

  let profile = play
    .profile
    .take()
    .map(|p| p.trim().to_owned())
    .filter(|p| !p.is_empty());
  play.profile = match (profile, catalog.has_profiles()) {
    (None, true) => {
      return Err(ApiError::BadRequest("a ruleset profile is required".into()));
    }
    (Some(p), true) => match catalog.profile_name(&p) {
      Some(known) => Some(known.to_owned()),
      None => return Err(ApiError::BadRequest(format!("unknown profile {p:?}"))),
    },
    (Some(p), false) => {
      return Err(ApiError::BadRequest(format!(
        "profile {p:?} given but the catalog has no profiles"
      )));
    }
    (None, false) => None,
  };

  play.elements_used = canonicalize(&play.elements_used)
    .into_iter()
    .map(|e| match catalog.element_name(&e) {
      Some(known) => Ok(known.to_owned()),
      None => Err(ApiError::BadRequest(format!("unknown element {e:?}"))),
    })
    .collect::<Result<_, _>>()?;

  play.modules_on = canonicalize(&play.modules_on)
    .into_iter()
    .map(|m| match catalog.module_name(&m) {
      Some(known) => Ok(known.to_owned()),
      None => Err(ApiError::BadRequest(format!("unknown module {m:?}"))),
    })
    .collect::<Result<_, _>>()?;

  let trim = |s: Option<String>| s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
  play.auxiliary.winner = trim(play.auxiliary.winner.take());
  play.auxiliary.notes = trim(play.auxiliary.notes.take());

  Ok(play)
}

/// `POST /plays`: returns 201 + the stored [`PlayRecord`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewPlay>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlayStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let play = validate(&state.catalog, body)?;
  let record: PlayRecord = state.store.append(play).await.map_err(ApiError::store)?;
  tracing::info!(
    play_id = %record.play_id,
    player_count = ?record.player_count,
    elements = record.elements_used.len(),
    "play logged"
  );
  Ok((StatusCode::CREATED, Json(record)))
}
