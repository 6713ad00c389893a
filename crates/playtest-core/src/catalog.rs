//! The catalog: the static enumeration of selectable game elements.
//!
//! A catalog is loaded once at process start and never changes afterwards.
//! It is deserialised from a [`CatalogConfig`] and validated on the way in,
//! so every `Catalog` value in the program is known to be well formed.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, canonical};

// ─── Wildcard policy ─────────────────────────────────────────────────────────

/// Whether the wildcard element counts toward a play's element count when it
/// is compared against the recommended size for its player count.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WildcardCounting {
  /// Recommended sizes count only non-wildcard elements.
  #[default]
  Excluded,
  /// Recommended sizes count every element, the wildcard included.
  Included,
}

// ─── Config shape ────────────────────────────────────────────────────────────

/// Recommended subset size for one player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedSize {
  pub player_count: u32,
  pub size:         usize,
}

/// Unvalidated catalog, as written in configuration files.
///
/// Omitted fields are empty, never borrowed from the built-in catalog: a
/// config that names its own elements gets no wildcard, profiles or modules
/// unless it lists them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
  #[serde(default)]
  pub elements:          Vec<String>,
  #[serde(default)]
  pub wildcard:          Option<String>,
  #[serde(default)]
  pub recommended:       Vec<RecommendedSize>,
  #[serde(default)]
  pub profiles:          Vec<String>,
  #[serde(default)]
  pub modules:           Vec<String>,
  #[serde(default)]
  pub wildcard_counting: WildcardCounting,
}

impl Default for CatalogConfig {
  /// The catalog for "The Job": thirteen suits plus the Authority wildcard.
  fn default() -> Self {
    let names = |xs: &[&str]| xs.iter().map(|s| (*s).to_owned()).collect();
    Self {
      elements:          names(&[
        "Tools",
        "Goods",
        "Crew",
        "Access",
        "Spotlight",
        "Blackout",
        "Squeeze",
        "Clean-Up",
        "Leverage",
        "Aftermath",
        "Fog",
        "Middlemen",
        "Fence",
        "Authority",
      ]),
      wildcard:          Some("Authority".to_owned()),
      recommended:       [(2, 3), (3, 4), (4, 6), (5, 6)]
        .into_iter()
        .map(|(player_count, size)| RecommendedSize { player_count, size })
        .collect(),
      profiles:          names(&["Basic", "Standard", "Full", "Experimental"]),
      modules:           names(&[
        "Heat/Disgrace",
        "Safe",
        "Specialists",
        "Contingencies",
      ]),
      wildcard_counting: WildcardCounting::Excluded,
    }
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// A validated, immutable catalog.
///
/// Serialises to (and deserialises from) the [`CatalogConfig`] shape;
/// deserialisation re-runs validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogConfig", into = "CatalogConfig")]
pub struct Catalog {
  elements:          Vec<String>,
  wildcard:          Option<String>,
  recommended:       BTreeMap<u32, usize>,
  profiles:          Vec<String>,
  modules:           Vec<String>,
  wildcard_counting: WildcardCounting,
}

impl Default for Catalog {
  fn default() -> Self {
    Self::try_from(CatalogConfig::default())
      .unwrap_or_else(|e| unreachable!("built-in catalog is valid: {e}"))
  }
}

impl TryFrom<CatalogConfig> for Catalog {
  type Error = Error;

  fn try_from(config: CatalogConfig) -> Result<Self> {
    let elements = distinct_names("element", config.elements)?;
    if elements.is_empty() {
      return Err(Error::InvalidCatalog("no elements configured".into()));
    }
    if let Some(bad) = elements
      .iter()
      .find(|e| e.contains(canonical::ELEMENT_SEPARATOR))
    {
      return Err(Error::InvalidCatalog(format!(
        "element {bad:?} contains the reserved separator {:?}",
        canonical::ELEMENT_SEPARATOR
      )));
    }

    let wildcard = match config.wildcard.as_deref().map(str::trim) {
      None | Some("") => None,
      Some(w) => {
        let found = elements
          .iter()
          .find(|e| canonical::same_name(e, w))
          .ok_or_else(|| {
            Error::InvalidCatalog(format!("wildcard {w:?} is not an element"))
          })?;
        Some(found.clone())
      }
    };

    let universe_len = elements.len() - usize::from(wildcard.is_some());
    let mut recommended = BTreeMap::new();
    for RecommendedSize { player_count, size } in config.recommended {
      if player_count == 0 {
        return Err(Error::InvalidCatalog("player count must be positive".into()));
      }
      if size == 0 || size > universe_len {
        return Err(Error::InvalidCatalog(format!(
          "recommended size {size} for {player_count} players is outside 1..={universe_len}"
        )));
      }
      if recommended.insert(player_count, size).is_some() {
        return Err(Error::InvalidCatalog(format!(
          "player count {player_count} listed twice"
        )));
      }
    }

    let profiles = distinct_names("profile", config.profiles)?;
    if let Some(bad) = profiles.iter().find(|p| p.contains(':')) {
      return Err(Error::InvalidCatalog(format!(
        "profile {bad:?} must not contain ':'"
      )));
    }
    let modules = distinct_names("module", config.modules)?;

    Ok(Self {
      elements,
      wildcard,
      recommended,
      profiles,
      modules,
      wildcard_counting: config.wildcard_counting,
    })
  }
}

impl From<Catalog> for CatalogConfig {
  fn from(c: Catalog) -> Self {
    Self {
      elements:          c.elements,
      wildcard:          c.wildcard,
      recommended:       c
        .recommended
        .into_iter()
        .map(|(player_count, size)| RecommendedSize { player_count, size })
        .collect(),
      profiles:          c.profiles,
      modules:           c.modules,
      wildcard_counting: c.wildcard_counting,
    }
  }
}

/// Trim every name and reject empties and case-insensitive duplicates.
fn distinct_names(what: &str, names: Vec<String>) -> Result<Vec<String>> {
  let mut seen = HashSet::new();
  names
    .into_iter()
    .map(|n| {
      let n = n.trim().to_owned();
      if n.is_empty() {
        return Err(Error::InvalidCatalog(format!("empty {what} name")));
      }
      if !seen.insert(canonical::name_key(&n)) {
        return Err(Error::InvalidCatalog(format!("duplicate {what} {n:?}")));
      }
      Ok(n)
    })
    .collect()
}

impl Catalog {
  /// All elements in catalog order, the wildcard included.
  pub fn elements(&self) -> &[String] { &self.elements }

  pub fn wildcard(&self) -> Option<&str> { self.wildcard.as_deref() }

  pub fn profiles(&self) -> &[String] { &self.profiles }

  pub fn modules(&self) -> &[String] { &self.modules }

  pub fn wildcard_counting(&self) -> WildcardCounting { self.wildcard_counting }

  /// Player count → recommended subset size, ascending by player count.
  pub fn recommended(&self) -> &BTreeMap<u32, usize> { &self.recommended }

  pub fn recommended_size(&self, player_count: u32) -> Option<usize> {
    self.recommended.get(&player_count).copied()
  }

  pub fn player_counts(&self) -> impl Iterator<Item = u32> + '_ {
    self.recommended.keys().copied()
  }

  /// Whether a profile dimension crosses the combination space.
  pub fn has_profiles(&self) -> bool { !self.profiles.is_empty() }

  /// The combinatorial universe: every element except the wildcard.
  pub fn universe(&self) -> Vec<&str> {
    self
      .elements
      .iter()
      .filter(|e| !self.is_wildcard(e))
      .map(String::as_str)
      .collect()
  }

  pub fn is_wildcard(&self, name: &str) -> bool {
    self
      .wildcard
      .as_deref()
      .is_some_and(|w| canonical::same_name(w, name))
  }

  pub fn is_known_element(&self, name: &str) -> bool { self.element_name(name).is_some() }

  pub fn is_known_profile(&self, name: &str) -> bool { self.profile_name(name).is_some() }

  pub fn is_known_module(&self, name: &str) -> bool { self.module_name(name).is_some() }

  /// The catalog's spelling of element `name`, matched case-insensitively.
  pub fn element_name(&self, name: &str) -> Option<&str> { lookup(&self.elements, name) }

  /// The catalog's spelling of profile `name`, matched case-insensitively.
  pub fn profile_name(&self, name: &str) -> Option<&str> { lookup(&self.profiles, name) }

  /// The catalog's spelling of module `name`, matched case-insensitively.
  pub fn module_name(&self, name: &str) -> Option<&str> { lookup(&self.modules, name) }

  /// Drop every occurrence of the wildcard from `names`.
  pub fn strip_wildcard<'a, S>(&self, names: &'a [S]) -> Vec<&'a str>
  where
    S: AsRef<str>,
  {
    names
      .iter()
      .map(AsRef::as_ref)
      .filter(|n| !self.is_wildcard(n))
      .collect()
  }

  /// The element count used for density classification, under the
  /// configured [`WildcardCounting`] policy.
  pub fn counted_elements<S: AsRef<str>>(&self, names: &[S]) -> usize {
    match self.wildcard_counting {
      WildcardCounting::Included => canonical::canonicalize(names).len(),
      WildcardCounting::Excluded => {
        canonical::canonicalize(self.strip_wildcard(names)).len()
      }
    }
  }
}

fn lookup<'a>(names: &'a [String], name: &str) -> Option<&'a str> {
  names
    .iter()
    .find(|n| canonical::same_name(n, name))
    .map(String::as_str)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn config(elements: &[&str], wildcard: Option<&str>, sizes: &[(u32, usize)]) -> CatalogConfig {
    CatalogConfig {
      elements:          elements.iter().map(|s| (*s).to_owned()).collect(),
      wildcard:          wildcard.map(str::to_owned),
      recommended:       sizes
        .iter()
        .map(|&(player_count, size)| RecommendedSize { player_count, size })
        .collect(),
      profiles:          vec![],
      modules:           vec![],
      wildcard_counting: WildcardCounting::Excluded,
    }
  }

  #[test]
  fn default_catalog_is_the_job() {
    let c = Catalog::default();
    assert_eq!(c.elements().len(), 14);
    assert_eq!(c.wildcard(), Some("Authority"));
    assert_eq!(c.universe().len(), 13);
    assert_eq!(c.player_counts().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    assert_eq!(c.recommended_size(4), Some(6));
    assert_eq!(c.recommended_size(6), None);
    assert_eq!(c.profiles().len(), 4);
  }

  #[test]
  fn profile_lookup_returns_catalog_spelling() {
    let c = Catalog::default();
    assert_eq!(c.profile_name(" standard"), Some("Standard"));
    assert!(c.is_known_profile("EXPERIMENTAL"));
    assert!(!c.is_known_profile("Hard"));
    assert!(c.is_known_module("safe"));
    assert!(c.is_known_element("clean-up"));
    assert_eq!(c.element_name("clean-up "), Some("Clean-Up"));
    assert_eq!(c.module_name("HEAT/disgrace"), Some("Heat/Disgrace"));
    assert_eq!(c.element_name("Nope"), None);
  }

  #[test]
  fn universe_keeps_catalog_order_without_wildcard() {
    let c = Catalog::try_from(config(&["X", "Y", "Z", "Authority"], Some("Authority"), &[(2, 2)]))
      .unwrap();
    assert_eq!(c.universe(), vec!["X", "Y", "Z"]);
  }

  #[test]
  fn wildcard_must_be_an_element() {
    let err = Catalog::try_from(config(&["X", "Y"], Some("Authority"), &[(2, 1)]));
    assert!(matches!(err, Err(Error::InvalidCatalog(_))));
  }

  #[test]
  fn size_larger_than_universe_rejected() {
    let err = Catalog::try_from(config(&["X", "Y", "W"], Some("W"), &[(2, 3)]));
    assert!(matches!(err, Err(Error::InvalidCatalog(_))));
  }

  #[test]
  fn duplicate_elements_rejected() {
    let err = Catalog::try_from(config(&["X", " x "], None, &[]));
    assert!(matches!(err, Err(Error::InvalidCatalog(_))));
  }

  #[test]
  fn separator_in_element_rejected() {
    let err = Catalog::try_from(config(&["X|Y"], None, &[]));
    assert!(matches!(err, Err(Error::InvalidCatalog(_))));
  }

  #[test]
  fn strip_wildcard_is_case_insensitive() {
    let c = Catalog::try_from(config(&["X", "Y", "Authority"], Some("Authority"), &[]))
      .unwrap();
    let names = vec!["authority ".to_owned(), "X".to_owned()];
    assert_eq!(c.strip_wildcard(&names), vec!["X"]);
  }

  #[test]
  fn counted_elements_follows_policy() {
    let mut cfg = config(&["X", "Y", "Authority"], Some("Authority"), &[(2, 2)]);
    let names = ["Authority", "X", "Y"];

    let excluded = Catalog::try_from(cfg.clone()).unwrap();
    assert_eq!(excluded.counted_elements(&names), 2);

    cfg.wildcard_counting = WildcardCounting::Included;
    let included = Catalog::try_from(cfg).unwrap();
    assert_eq!(included.counted_elements(&names), 3);
  }

  #[test]
  fn json_roundtrip_revalidates() {
    let c = Catalog::default();
    let json = serde_json::to_string(&c).unwrap();
    let back: Catalog = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);

    let bad = r#"{"elements":["X"],"wildcard":"Nope"}"#;
    assert!(serde_json::from_str::<Catalog>(bad).is_err());
  }

  #[test]
  fn partial_config_leaves_omitted_fields_empty() {
    let json = r#"{
      "elements": ["Red", "Blue", "Green", "Joker"],
      "wildcard": "Joker",
      "recommended": [{ "player_count": 2, "size": 2 }]
    }"#;
    let cfg: CatalogConfig = serde_json::from_str(json).unwrap();
    assert!(cfg.profiles.is_empty());
    assert!(cfg.modules.is_empty());
    assert_eq!(cfg.wildcard_counting, WildcardCounting::Excluded);

    let c = Catalog::try_from(cfg).unwrap();
    assert!(!c.has_profiles());
    assert_eq!(c.universe(), vec!["Red", "Blue", "Green"]);

    let cfg: CatalogConfig = serde_json::from_str(r#"{"elements":["Red","Blue"]}"#).unwrap();
    assert_eq!(cfg.wildcard, None);
    assert!(cfg.recommended.is_empty());
    let c = Catalog::try_from(cfg).unwrap();
    assert_eq!(c.wildcard(), None);
    assert_eq!(c.player_counts().count(), 0);
  }

  #[test]
  fn wildcard_counting_parses_from_str() {
    assert_eq!("included".parse::<WildcardCounting>().unwrap(), WildcardCounting::Included);
    assert_eq!(WildcardCounting::Excluded.to_string(), "excluded");
  }
}
