//! Observed combinations: what was actually played, whether recommended or
//! not.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  canonical::{canonicalize, identify_with_profile},
  catalog::Catalog,
  density::{DensityLabel, classify},
  play::PlayRecord,
};

/// One distinct (player count, profile, full element set) seen in the log.
///
/// Unlike coverage rows, the wildcard is kept and nothing is restricted to
/// the recommended universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedCombination {
  pub combination_id: String,
  pub player_count:   u32,
  pub profile:        Option<String>,
  pub elements_used:  Vec<String>,
  /// Number of elements in `elements_used`, the wildcard included.
  pub suit_count:     usize,
  pub played_count:   usize,
  pub last_played:    DateTime<Utc>,
  pub density:        DensityLabel,
}

/// Group `records` by their full canonical combination.
///
/// Sorted by player count ascending, then most played first; ties fall back
/// to the identifier. Records without a player count are skipped.
pub fn compute_observed(catalog: &Catalog, records: &[PlayRecord]) -> Vec<ObservedCombination> {
  let mut out: Vec<ObservedCombination> = Vec::new();
  let mut index: HashMap<String, usize> = HashMap::new();

  for record in records {
    let Some(player_count) = record.player_count else {
      continue;
    };
    let profile = if catalog.has_profiles() {
      record.profile.as_deref().map(|p| {
        catalog
          .profile_name(p)
          .map_or_else(|| p.trim().to_owned(), str::to_owned)
      })
    } else {
      None
    };
    let elements = canonicalize(&record.elements_used);
    let id = identify_with_profile(player_count, profile.as_deref(), &elements);

    match index.get(&id) {
      Some(&i) => {
        let group = &mut out[i];
        group.played_count += 1;
        group.last_played = group.last_played.max(record.recorded_at);
      }
      None => {
        let density = classify(catalog, player_count, catalog.counted_elements(&elements));
        index.insert(id.clone(), out.len());
        out.push(ObservedCombination {
          combination_id: id,
          player_count,
          profile,
          suit_count: elements.len(),
          elements_used: elements,
          played_count: 1,
          last_played: record.recorded_at,
          density,
        });
      }
    }
  }

  out.sort_by(|a, b| {
    a.player_count
      .cmp(&b.player_count)
      .then_with(|| b.played_count.cmp(&a.played_count))
      .then_with(|| a.combination_id.cmp(&b.combination_id))
  });
  out
}
