//! Handlers for the catalog and the derived reports.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/catalog` | The loaded catalog |
//! | `GET`  | `/coverage` | Filters: `player_count`, `profile` (comma-separated), `includes` |
//! | `GET`  | `/gaps` | Same filters; unplayed rows in suggestion order |
//! | `GET`  | `/gaps/suggestion` | First gap, or `null` |
//! | `GET`  | `/observed` | Observed combinations |
//! | `GET`  | `/density` | `?player_count=&element_count=` |
//! | `GET`  | `/stats` | Optional `?top=N` (default 15) |
//!
//! Report responses carry an `ETag` over the play log and honour
//! `If-None-Match`.

use axum::{
  Json,
  extract::{Query, State},
  http::HeaderMap,
  response::Response,
};
use playtest_core::{
  catalog::Catalog,
  combination::enumerate_recommended,
  coverage::{
    CoverageFilter, CoverageRow, compute_coverage, compute_gaps, suggest_next,
    suggestion_order,
  },
  density::{DensityReport, report},
  observed::compute_observed,
  play::PlayRecord,
  stats::summarize,
  store::PlayStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, etag};

const DEFAULT_TOP: usize = 15;

// ─── Catalog ──────────────────────────────────────────────────────────────────

/// `GET /catalog`
pub async fn catalog<S>(State(state): State<ApiState<S>>) -> Json<Catalog>
where
  S: PlayStore,
{
  Json(Catalog::clone(&state.catalog))
}

// ─── Coverage ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
  /// Comma-separated player counts, e.g. `2,3`.
  pub player_count: Option<String>,
  /// Comma-separated profile names.
  pub profile:      Option<String>,
  /// Keep only combinations that include this element.
  pub includes:     Option<String>,
}

impl TryFrom<FilterParams> for CoverageFilter {
  type Error = ApiError;

  fn try_from(p: FilterParams) -> Result<Self, ApiError> {
    let player_counts = split_list(p.player_count.as_deref())
      .map(|s| {
        s.parse::<u32>()
          .map_err(|_| ApiError::BadRequest(format!("invalid player count {s:?}")))
      })
      .collect::<Result<_, _>>()?;
    Ok(CoverageFilter {
      player_counts,
      profiles: split_list(p.profile.as_deref()).map(str::to_owned).collect(),
      must_include: p
        .includes
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty()),
    })
  }
}

fn split_list(s: Option<&str>) -> impl Iterator<Item = &str> {
  s.unwrap_or_default()
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

fn coverage_rows(catalog: &Catalog, records: &[PlayRecord]) -> Vec<CoverageRow> {
  compute_coverage(catalog, &enumerate_recommended(catalog), records)
}

fn filtered_gaps(
  catalog: &Catalog,
  records: &[PlayRecord],
  filter: &CoverageFilter,
) -> Vec<CoverageRow> {
  let mut gaps = filter.apply(compute_gaps(&coverage_rows(catalog, records)));
  gaps.sort_by(suggestion_order);
  gaps
}

/// `GET /coverage[?player_count=..][&profile=..][&includes=..]`
pub async fn coverage<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<FilterParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PlayStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filter = CoverageFilter::try_from(params)?;
  let records = state.snapshot().await?;
  let tag = etag::compute_etag(&state.catalog, &records);
  Ok(etag::conditional_json(&headers, &tag, || {
    filter.apply(coverage_rows(&state.catalog, &records))
  }))
}

/// `GET /gaps[?player_count=..][&profile=..][&includes=..]`
pub async fn gaps<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<FilterParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PlayStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filter = CoverageFilter::try_from(params)?;
  let records = state.snapshot().await?;
  let tag = etag::compute_etag(&state.catalog, &records);
  Ok(etag::conditional_json(&headers, &tag, || {
    filtered_gaps(&state.catalog, &records, &filter)
  }))
}

/// `GET /gaps/suggestion`: the next combination to play, or `null`.
pub async fn suggestion<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<FilterParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PlayStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filter = CoverageFilter::try_from(params)?;
  let records = state.snapshot().await?;
  let tag = etag::compute_etag(&state.catalog, &records);
  Ok(etag::conditional_json(&headers, &tag, || {
    suggest_next(&filtered_gaps(&state.catalog, &records, &filter))
  }))
}

// ─── Observed ─────────────────────────────────────────────────────────────────

/// `GET /observed`
pub async fn observed<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PlayStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = state.snapshot().await?;
  let tag = etag::compute_etag(&state.catalog, &records);
  Ok(etag::conditional_json(&headers, &tag, || {
    compute_observed(&state.catalog, &records)
  }))
}

// ─── Density ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DensityParams {
  pub player_count:  u32,
  pub element_count: usize,
}

/// `GET /density?player_count=<n>&element_count=<k>`
pub async fn density<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<DensityParams>,
) -> Json<DensityReport>
where
  S: PlayStore,
{
  Json(report(&state.catalog, params.player_count, params.element_count))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatsParams {
  pub top: Option<usize>,
}

/// `GET /stats[?top=N]`
pub async fn stats<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<StatsParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PlayStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = state.snapshot().await?;
  let tag = etag::compute_etag(&state.catalog, &records);
  Ok(etag::conditional_json(&headers, &tag, || {
    let rows = coverage_rows(&state.catalog, &records);
    summarize(&rows, &records, params.top.unwrap_or(DEFAULT_TOP))
  }))
}
