//! Density labels: how an element count compares to the recommended size.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Classification of an element count against the recommended size.
///
/// `Over` and `Under` carry the signed difference `element_count -
/// recommended`, so `Over(1)` and `Under(-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::AsRefStr)]
#[serde(tag = "label", content = "diff", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DensityLabel {
  Recommended,
  Over(i64),
  Under(i64),
  /// The player count has no recommended size in the catalog.
  Unknown,
}

impl DensityLabel {
  /// The signed difference from the recommended size, when known.
  pub fn diff(&self) -> Option<i64> {
    match self {
      Self::Recommended => Some(0),
      Self::Over(d) | Self::Under(d) => Some(*d),
      Self::Unknown => None,
    }
  }
}

impl fmt::Display for DensityLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Recommended => f.write_str("recommended"),
      Self::Over(d) => write!(f, "over by {d}"),
      Self::Under(d) => write!(f, "under by {}", d.unsigned_abs()),
      Self::Unknown => f.write_str("unknown"),
    }
  }
}

/// Label `element_count` against the recommended size for `player_count`.
pub fn classify(catalog: &Catalog, player_count: u32, element_count: usize) -> DensityLabel {
  let Some(recommended) = catalog.recommended_size(player_count) else {
    return DensityLabel::Unknown;
  };
  let diff = element_count as i64 - recommended as i64;
  match diff {
    0 => DensityLabel::Recommended,
    d if d > 0 => DensityLabel::Over(d),
    d => DensityLabel::Under(d),
  }
}

/// A classification together with its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityReport {
  pub player_count:  u32,
  pub element_count: usize,
  /// `None` when the player count is not in the catalog.
  pub recommended:   Option<usize>,
  pub density:       DensityLabel,
}

pub fn report(catalog: &Catalog, player_count: u32, element_count: usize) -> DensityReport {
  DensityReport {
    player_count,
    element_count,
    recommended: catalog.recommended_size(player_count),
    density: classify(catalog, player_count, element_count),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn boundaries_around_recommended() {
    let c = Catalog::default();
    assert_eq!(c.recommended_size(4), Some(6));
    assert_eq!(classify(&c, 4, 6), DensityLabel::Recommended);
    assert_eq!(classify(&c, 4, 7), DensityLabel::Over(1));
    assert_eq!(classify(&c, 4, 5), DensityLabel::Under(-1));
    assert_eq!(classify(&c, 2, 0), DensityLabel::Under(-3));
  }

  #[test]
  fn unknown_player_count() {
    let c = Catalog::default();
    assert_eq!(classify(&c, 6, 3), DensityLabel::Unknown);
    assert_eq!(classify(&c, 0, 0), DensityLabel::Unknown);
    assert_eq!(DensityLabel::Unknown.diff(), None);
  }

  #[test]
  fn report_carries_inputs() {
    let r = report(&Catalog::default(), 3, 5);
    assert_eq!(r.recommended, Some(4));
    assert_eq!(r.density, DensityLabel::Over(1));
    assert_eq!(report(&Catalog::default(), 7, 5).recommended, None);
  }

  #[test]
  fn display_and_kind() {
    assert_eq!(DensityLabel::Over(2).to_string(), "over by 2");
    assert_eq!(DensityLabel::Under(-1).to_string(), "under by 1");
    assert_eq!(DensityLabel::Under(-1).as_ref(), "under");
    assert_eq!(DensityLabel::Recommended.as_ref(), "recommended");
  }

  #[test]
  fn serialises_with_diff() {
    let v = serde_json::to_value(DensityLabel::Over(1)).unwrap();
    assert_eq!(v, serde_json::json!({ "label": "over", "diff": 1 }));
    let v = serde_json::to_value(DensityLabel::Recommended).unwrap();
    assert_eq!(v, serde_json::json!({ "label": "recommended" }));
  }
}
