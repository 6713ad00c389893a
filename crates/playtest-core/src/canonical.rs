//! Canonical element lists and combination identifiers.
//!
//! Every place that compares or displays a set of element names goes through
//! [`canonicalize`], and every join between recorded plays and enumerated
//! combinations goes through [`identify`].

use std::collections::HashSet;

/// Joins element names inside an identifier. Catalog names may not contain it.
pub const ELEMENT_SEPARATOR: char = '|';

/// Separates the player count, profile, and element list in an identifier.
pub const KEY_SEPARATOR: &str = "::";

/// The comparison key for an element name: trimmed and lowercased.
pub fn name_key(name: &str) -> String { name.trim().to_lowercase() }

/// Whether two names denote the same element.
pub fn same_name(a: &str, b: &str) -> bool { name_key(a) == name_key(b) }

/// Normalise a collection of element names.
///
/// Blank entries are dropped, the rest are trimmed, names that differ only by
/// case collapse to the first one seen, and the result is sorted by the
/// case-insensitive key. Original casing is preserved.
pub fn canonicalize<I, S>(names: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut seen = HashSet::new();
  let mut out: Vec<String> = names
    .into_iter()
    .filter_map(|n| {
      let trimmed = n.as_ref().trim();
      (!trimmed.is_empty() && seen.insert(trimmed.to_lowercase()))
        .then(|| trimmed.to_owned())
    })
    .collect();
  // Keys are unique after dedup, so this order is total.
  out.sort_by_cached_key(|n| n.to_lowercase());
  out
}

/// Stable identifier for a player count and a set of elements.
///
/// Format: `"{player_count}P::{a|b|c}"` with lowercased canonical names.
pub fn identify<I, S>(player_count: u32, elements: I) -> String
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  identify_with_profile(player_count, None, elements)
}

/// Like [`identify`], with a ruleset profile between the player count and
/// the element list: `"{player_count}P::{profile}::{a|b|c}"`.
pub fn identify_with_profile<I, S>(
  player_count: u32,
  profile: Option<&str>,
  elements: I,
) -> String
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let joined = join_key(&canonicalize(elements));
  match profile {
    Some(p) => format!("{player_count}P{KEY_SEPARATOR}{}{KEY_SEPARATOR}{joined}", p.trim()),
    None => format!("{player_count}P{KEY_SEPARATOR}{joined}"),
  }
}

/// Join already-canonical names into the element part of an identifier.
///
/// A separator or backslash inside a name is backslash-escaped, so a name
/// like `"X|Y"` never collides with the pair `X`, `Y`.
pub(crate) fn join_key(canonical: &[String]) -> String {
  let sep = ELEMENT_SEPARATOR.to_string();
  canonical
    .iter()
    .map(|n| escape_name(&n.to_lowercase()))
    .collect::<Vec<_>>()
    .join(&sep)
}

fn escape_name(name: &str) -> String {
  let mut out = String::with_capacity(name.len());
  for ch in name.chars() {
    if ch == '\\' || ch == ELEMENT_SEPARATOR {
      out.push('\\');
    }
    out.push(ch);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trims_dedups_and_sorts_case_insensitively() {
    assert_eq!(canonicalize(["B", "a", "A", " b "]), vec!["a", "B"]);
  }

  #[test]
  fn drops_blank_entries() {
    assert_eq!(canonicalize(["", "  ", "Fog", "\t"]), vec!["Fog"]);
    assert!(canonicalize(Vec::<String>::new()).is_empty());
  }

  #[test]
  fn is_idempotent() {
    let inputs: [&[&str]; 4] = [
      &["Tools", "goods", " Crew", "crew", ""],
      &["Clean-Up", "Access", "access "],
      &[],
      &["Z", "y", "X", "w"],
    ];
    for input in inputs {
      let once = canonicalize(input);
      assert_eq!(canonicalize(&once), once, "input: {input:?}");
    }
  }

  #[test]
  fn identify_ignores_order_and_duplicates() {
    let base = identify(3, ["Fog", "Fence", "Crew"]);
    assert_eq!(base, "3P::crew|fence|fog");
    for perm in [
      ["Crew", "Fence", "Fog"],
      ["Fence", "Fog", "Crew"],
      ["Fog", "Crew", "Fence"],
    ] {
      assert_eq!(identify(3, perm), base);
    }
    assert_eq!(identify(3, ["Fog", "Fog ", "Crew", "Fence"]), base);
  }

  #[test]
  fn identify_distinguishes_player_count_and_sets() {
    assert_ne!(identify(3, ["Fog", "Crew"]), identify(4, ["Fog", "Crew"]));
    assert_ne!(identify(3, ["Fog", "Crew"]), identify(3, ["Fog", "Fence"]));
    assert_ne!(identify(3, ["Fog"]), identify(3, ["Fog", "Crew"]));
  }

  #[test]
  fn separator_inside_a_name_does_not_collide() {
    assert_ne!(identify(2, ["X|Y"]), identify(2, ["X", "Y"]));
    assert_eq!(identify(2, ["X|Y"]), "2P::x\\|y");
    assert_ne!(identify(2, ["X\\", "Y"]), identify(2, ["X\\|Y"]));
  }

  #[test]
  fn identify_with_profile_embeds_profile() {
    assert_eq!(
      identify_with_profile(4, Some("Standard"), ["Goods", "Access"]),
      "4P::Standard::access|goods"
    );
    assert_ne!(
      identify_with_profile(4, Some("Basic"), ["Goods"]),
      identify_with_profile(4, Some("Full"), ["Goods"])
    );
  }

  #[test]
  fn same_name_ignores_case_and_padding() {
    assert!(same_name(" Authority", "authority"));
    assert!(!same_name("Fog", "Fence"));
  }
}
