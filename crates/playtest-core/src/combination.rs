//! Combinations and the enumerator of the recommended combination space.

use serde::{Deserialize, Serialize};

use crate::{
  canonical::{canonicalize, identify_with_profile},
  catalog::Catalog,
};

/// A player count, optional ruleset profile, and canonical element subset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combination {
  pub combination_id: String,
  pub player_count:   u32,
  pub profile:        Option<String>,
  /// Canonical element list (see [`canonicalize`]).
  pub elements:       Vec<String>,
}

impl Combination {
  pub fn new<I, S>(player_count: u32, profile: Option<String>, elements: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let elements = canonicalize(elements);
    let combination_id =
      identify_with_profile(player_count, profile.as_deref(), &elements);
    Self { combination_id, player_count, profile, elements }
  }
}

// ─── Subsets ─────────────────────────────────────────────────────────────────

/// Lazily yields every `k`-element subset of `pool`, without repetition, in
/// lexicographic order of positions.
pub struct Subsets<'a, T> {
  pool:    &'a [T],
  indices: Vec<usize>,
  done:    bool,
}

impl<'a, T> Subsets<'a, T> {
  pub fn new(pool: &'a [T], k: usize) -> Self {
    Self { pool, indices: (0..k).collect(), done: k > pool.len() }
  }

  fn advance(&mut self) {
    let n = self.pool.len();
    let k = self.indices.len();
    // Rightmost position that has not reached its maximum value.
    match (0..k).rev().find(|&i| self.indices[i] != i + n - k) {
      Some(i) => {
        self.indices[i] += 1;
        for j in i + 1..k {
          self.indices[j] = self.indices[j - 1] + 1;
        }
      }
      None => self.done = true,
    }
  }
}

impl<'a, T> Iterator for Subsets<'a, T> {
  type Item = Vec<&'a T>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    let item = self.indices.iter().map(|&i| &self.pool[i]).collect();
    self.advance();
    Some(item)
  }
}

/// `C(n, k)`; zero when `k > n`.
pub fn binomial(n: usize, k: usize) -> usize {
  if k > n {
    return 0;
  }
  let k = k.min(n - k);
  (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

// ─── Enumerator ──────────────────────────────────────────────────────────────

/// Every recommended combination in the catalog.
///
/// For each player count, every subset of the universe (the elements minus
/// the wildcard) of exactly the recommended size, crossed with every profile
/// when the catalog has any. Output length is
/// `Σ C(n, k_pc) × max(1, profile count)`.
pub fn enumerate_recommended(catalog: &Catalog) -> Vec<Combination> {
  let universe = catalog.universe();
  let profiles: Vec<Option<&str>> = if catalog.has_profiles() {
    catalog.profiles().iter().map(|p| Some(p.as_str())).collect()
  } else {
    vec![None]
  };

  let total = catalog
    .recommended()
    .values()
    .map(|&k| binomial(universe.len(), k))
    .sum::<usize>()
    * profiles.len();
  let mut out = Vec::with_capacity(total);

  for (&player_count, &size) in catalog.recommended() {
    for subset in Subsets::new(&universe, size) {
      let elements = canonicalize(subset);
      for profile in &profiles {
        out.push(Combination {
          combination_id: identify_with_profile(player_count, *profile, &elements),
          player_count,
          profile: profile.map(str::to_owned),
          elements: elements.clone(),
        });
      }
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;
  use crate::catalog::{CatalogConfig, RecommendedSize, WildcardCounting};

  fn catalog(elements: &[&str], wildcard: Option<&str>, sizes: &[(u32, usize)]) -> Catalog {
    Catalog::try_from(CatalogConfig {
      elements:          elements.iter().map(|s| (*s).to_owned()).collect(),
      wildcard:          wildcard.map(str::to_owned),
      recommended:       sizes
        .iter()
        .map(|&(player_count, size)| RecommendedSize { player_count, size })
        .collect(),
      profiles:          vec![],
      modules:           vec![],
      wildcard_counting: WildcardCounting::Excluded,
    })
    .unwrap()
  }

  const THIRTEEN: [&str; 13] =
    ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M"];

  #[test]
  fn subsets_counts_match_binomial() {
    let pool: Vec<usize> = (0..7).collect();
    for k in 0..=8 {
      assert_eq!(Subsets::new(&pool, k).count(), binomial(7, k), "k={k}");
    }
  }

  #[test]
  fn subsets_are_distinct_and_sized() {
    let pool = ["a", "b", "c", "d", "e"];
    let all: Vec<_> = Subsets::new(&pool, 3).collect();
    assert_eq!(all.len(), 10);
    assert!(all.iter().all(|s| s.len() == 3));
    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(unique.len(), all.len());
  }

  #[test]
  fn binomial_values() {
    assert_eq!(binomial(13, 6), 1716);
    assert_eq!(binomial(12, 6), 924);
    assert_eq!(binomial(3, 2), 3);
    assert_eq!(binomial(4, 0), 1);
    assert_eq!(binomial(2, 3), 0);
  }

  #[test]
  fn thirteen_without_wildcard_gives_1716() {
    let c = catalog(&THIRTEEN, None, &[(4, 6)]);
    let combos = enumerate_recommended(&c);
    assert_eq!(combos.len(), 1716);
    let ids: HashSet<_> = combos.iter().map(|c| &c.combination_id).collect();
    assert_eq!(ids.len(), 1716);
  }

  #[test]
  fn thirteen_with_wildcard_gives_924() {
    let c = catalog(&THIRTEEN, Some("M"), &[(4, 6)]);
    let combos = enumerate_recommended(&c);
    assert_eq!(combos.len(), 924);
    assert!(combos.iter().all(|c| !c.elements.contains(&"M".to_owned())));
  }

  #[test]
  fn default_catalog_crosses_profiles() {
    let c = Catalog::default();
    let combos = enumerate_recommended(&c);
    let per_profile = binomial(13, 3) + binomial(13, 4) + 2 * binomial(13, 6);
    assert_eq!(combos.len(), per_profile * 4);
    let ids: HashSet<_> = combos.iter().map(|c| c.combination_id.as_str()).collect();
    assert_eq!(ids.len(), combos.len());
  }

  #[test]
  fn enumeration_is_deterministic() {
    let c = Catalog::default();
    let a: Vec<_> = enumerate_recommended(&c).into_iter().map(|c| c.combination_id).collect();
    let b: Vec<_> = enumerate_recommended(&c).into_iter().map(|c| c.combination_id).collect();
    assert_eq!(a, b);
  }

  #[test]
  fn small_catalog_exact_combinations() {
    let c = catalog(&["X", "Y", "Z", "Authority"], Some("Authority"), &[(2, 2)]);
    let ids: Vec<_> = enumerate_recommended(&c)
      .into_iter()
      .map(|c| c.combination_id)
      .collect();
    assert_eq!(ids, vec!["2P::x|y", "2P::x|z", "2P::y|z"]);
  }

  #[test]
  fn combination_new_canonicalizes() {
    let c = Combination::new(2, None, ["Y", " X", "y"]);
    assert_eq!(c.elements, vec!["X", "Y"]);
    assert_eq!(c.combination_id, "2P::x|y");
  }
}
