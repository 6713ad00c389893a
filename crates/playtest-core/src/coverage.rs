//! The coverage engine: which recommended combinations have been played.
//!
//! Coverage is recomputed from the full play log on every call. Nothing here
//! holds state between calls.

use std::{cmp::Ordering, collections::HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  canonical::{identify_with_profile, same_name},
  catalog::Catalog,
  combination::Combination,
  play::PlayRecord,
};

/// A recommended combination annotated with how often it was played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRow {
  pub combination_id: String,
  pub player_count:   u32,
  pub profile:        Option<String>,
  pub elements_used:  Vec<String>,
  pub played_count:   usize,
  pub last_played:    Option<DateTime<Utc>>,
}

impl CoverageRow {
  pub fn is_played(&self) -> bool { self.played_count > 0 }

  pub fn combination(&self) -> Combination {
    Combination {
      combination_id: self.combination_id.clone(),
      player_count:   self.player_count,
      profile:        self.profile.clone(),
      elements:       self.elements_used.clone(),
    }
  }
}

#[derive(Default)]
struct Tally {
  count: usize,
  last:  Option<DateTime<Utc>>,
}

/// The key a record is matched under, or `None` if it cannot match anything.
///
/// The wildcard is stripped first. When the catalog has profiles the record
/// must carry one of them, in any casing.
pub fn coverage_key(catalog: &Catalog, record: &PlayRecord) -> Option<String> {
  let player_count = record.player_count?;
  let profile = if catalog.has_profiles() {
    Some(catalog.profile_name(record.profile.as_deref()?)?)
  } else {
    None
  };
  let elements = catalog.strip_wildcard(&record.elements_used);
  Some(identify_with_profile(player_count, profile, elements))
}

/// Left join of `recommended` against `records`.
///
/// Every recommended combination yields exactly one row, in input order.
/// Records that match nothing are ignored here; they still show up in
/// [`crate::observed::compute_observed`].
pub fn compute_coverage(
  catalog: &Catalog,
  recommended: &[Combination],
  records: &[PlayRecord],
) -> Vec<CoverageRow> {
  let mut tallies: HashMap<String, Tally> = HashMap::new();
  for record in records {
    let Some(key) = coverage_key(catalog, record) else {
      continue;
    };
    let tally = tallies.entry(key).or_default();
    tally.count += 1;
    tally.last = tally.last.max(Some(record.recorded_at));
  }

  recommended
    .iter()
    .map(|combo| {
      let tally = tallies.get(&combo.combination_id);
      CoverageRow {
        combination_id: combo.combination_id.clone(),
        player_count:   combo.player_count,
        profile:        combo.profile.clone(),
        elements_used:  combo.elements.clone(),
        played_count:   tally.map_or(0, |t| t.count),
        last_played:    tally.and_then(|t| t.last),
      }
    })
    .collect()
}

/// Rows that have never been played, in input order.
pub fn compute_gaps(coverage: &[CoverageRow]) -> Vec<CoverageRow> {
  coverage.iter().filter(|r| !r.is_played()).cloned().collect()
}

/// Ordering used to suggest the next play: player count, then profile, then
/// identifier, all ascending.
pub fn suggestion_order(a: &CoverageRow, b: &CoverageRow) -> Ordering {
  a.player_count
    .cmp(&b.player_count)
    .then_with(|| a.profile.cmp(&b.profile))
    .then_with(|| a.combination_id.cmp(&b.combination_id))
}

/// The first gap in [`suggestion_order`], or `None` when everything has been
/// played.
pub fn suggest_next(gaps: &[CoverageRow]) -> Option<Combination> {
  gaps
    .iter()
    .filter(|r| !r.is_played())
    .min_by(|a, b| suggestion_order(a, b))
    .map(CoverageRow::combination)
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// Narrows coverage rows for display. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageFilter {
  pub player_counts: Vec<u32>,
  pub profiles:      Vec<String>,
  /// Keep only rows whose elements include this name.
  pub must_include:  Option<String>,
}

impl CoverageFilter {
  pub fn matches(&self, row: &CoverageRow) -> bool {
    let pc_ok = self.player_counts.is_empty()
      || self.player_counts.contains(&row.player_count);
    let profile_ok = self.profiles.is_empty()
      || row
        .profile
        .as_deref()
        .is_some_and(|p| self.profiles.iter().any(|f| same_name(f, p)));
    let include_ok = self
      .must_include
      .as_deref()
      .is_none_or(|want| row.elements_used.iter().any(|e| same_name(e, want)));
    pc_ok && profile_ok && include_ok
  }

  pub fn apply(&self, rows: Vec<CoverageRow>) -> Vec<CoverageRow> {
    rows.into_iter().filter(|r| self.matches(r)).collect()
  }
}
