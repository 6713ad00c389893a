//! Async HTTP client wrapping the playtest JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use playtest_core::{
  catalog::Catalog,
  combination::Combination,
  coverage::{CoverageFilter, CoverageRow},
  density::DensityReport,
  observed::ObservedCombination,
  play::{NewPlay, PlayRecord},
  stats::StatsReport,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};

/// Connection settings for the playtest API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the playtest JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Query pairs for a coverage filter, in the API's comma-list form.
pub fn filter_query(filter: &CoverageFilter) -> Vec<(&'static str, String)> {
  let mut q = Vec::new();
  if !filter.player_counts.is_empty() {
    let pcs: Vec<String> = filter.player_counts.iter().map(u32::to_string).collect();
    q.push(("player_count", pcs.join(",")));
  }
  if !filter.profiles.is_empty() {
    q.push(("profile", filter.profiles.join(",")));
  }
  if let Some(e) = &filter.must_include {
    q.push(("includes", e.clone()));
  }
  q
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Send `req` and decode a JSON body, surfacing the API's error message.
  async fn fetch<T: DeserializeOwned>(&self, label: &str, req: RequestBuilder) -> Result<T> {
    tracing::debug!(request = label, "sending");
    let resp = req.send().await.with_context(|| format!("{label} failed"))?;
    let resp = check(label, resp).await?;
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {label} response"))
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  /// `GET /api/catalog`
  pub async fn catalog(&self) -> Result<Catalog> {
    self.fetch("GET /catalog", self.client.get(self.url("/catalog"))).await
  }

  // ── Plays ─────────────────────────────────────────────────────────────────

  /// `GET /api/plays[?limit=N]`
  pub async fn list_plays(&self, limit: Option<usize>) -> Result<Vec<PlayRecord>> {
    let mut req = self.client.get(self.url("/plays"));
    if let Some(n) = limit {
      req = req.query(&[("limit", n)]);
    }
    self.fetch("GET /plays", req).await
  }

  /// `POST /api/plays`
  pub async fn log_play(&self, play: &NewPlay) -> Result<PlayRecord> {
    self
      .fetch("POST /plays", self.client.post(self.url("/plays")).json(play))
      .await
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  /// `GET /api/coverage`
  pub async fn coverage(&self, filter: &CoverageFilter) -> Result<Vec<CoverageRow>> {
    let req = self.client.get(self.url("/coverage")).query(&filter_query(filter));
    self.fetch("GET /coverage", req).await
  }

  /// `GET /api/gaps`
  pub async fn gaps(&self, filter: &CoverageFilter) -> Result<Vec<CoverageRow>> {
    let req = self.client.get(self.url("/gaps")).query(&filter_query(filter));
    self.fetch("GET /gaps", req).await
  }

  /// `GET /api/gaps/suggestion`
  pub async fn suggestion(&self, filter: &CoverageFilter) -> Result<Option<Combination>> {
    let req = self
      .client
      .get(self.url("/gaps/suggestion"))
      .query(&filter_query(filter));
    self.fetch("GET /gaps/suggestion", req).await
  }

  /// `GET /api/observed`
  pub async fn observed(&self) -> Result<Vec<ObservedCombination>> {
    self.fetch("GET /observed", self.client.get(self.url("/observed"))).await
  }

  /// `GET /api/density?player_count=<n>&element_count=<k>`
  pub async fn density(&self, player_count: u32, element_count: usize) -> Result<DensityReport> {
    let req = self.client.get(self.url("/density")).query(&[
      ("player_count", player_count.to_string()),
      ("element_count", element_count.to_string()),
    ]);
    self.fetch("GET /density", req).await
  }

  /// `GET /api/stats?top=<n>`
  pub async fn stats(&self, top: usize) -> Result<StatsReport> {
    let req = self.client.get(self.url("/stats")).query(&[("top", top)]);
    self.fetch("GET /stats", req).await
  }
}

async fn check(label: &str, resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  match resp.json::<ErrorBody>().await {
    Ok(body) => Err(anyhow!("{label} → {status}: {}", body.error)),
    Err(_) => Err(anyhow!("{label} → {status}")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_filter_sends_no_params() {
    assert!(filter_query(&CoverageFilter::default()).is_empty());
  }

  #[test]
  fn filter_lists_are_comma_joined() {
    let filter = CoverageFilter {
      player_counts: vec![2, 4],
      profiles:      vec!["Basic".into(), "Full".into()],
      must_include:  Some("Fog".into()),
    };
    assert_eq!(
      filter_query(&filter),
      vec![
        ("player_count", "2,4".to_string()),
        ("profile", "Basic,Full".to_string()),
        ("includes", "Fog".to_string()),
      ]
    );
  }

  #[test]
  fn url_joins_api_prefix() {
    let client = ApiClient::new(ApiConfig { base_url: "http://localhost:8501/".into() }).unwrap();
    assert_eq!(client.url("/gaps"), "http://localhost:8501/api/gaps");
  }
}
