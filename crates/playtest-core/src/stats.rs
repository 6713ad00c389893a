//! Frequency statistics over coverage rows and the play log.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
  canonical::{canonicalize, name_key},
  coverage::CoverageRow,
  play::PlayRecord,
};

/// Share of recommended combinations played at least once, per player count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCountCoverage {
  pub player_count: u32,
  pub total:        usize,
  pub played:       usize,
  /// `played / total`, or `0.0` when `total` is zero.
  pub rate:         f64,
}

pub fn coverage_by_player_count(rows: &[CoverageRow]) -> Vec<PlayerCountCoverage> {
  let mut by_pc: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
  for row in rows {
    let (total, played) = by_pc.entry(row.player_count).or_default();
    *total += 1;
    if row.is_played() {
      *played += 1;
    }
  }
  by_pc
    .into_iter()
    .map(|(player_count, (total, played))| PlayerCountCoverage {
      player_count,
      total,
      played,
      rate: if total == 0 { 0.0 } else { played as f64 / total as f64 },
    })
    .collect()
}

/// The `limit` most played rows: played count descending, then player count
/// and identifier ascending.
pub fn most_played(rows: &[CoverageRow], limit: usize) -> Vec<CoverageRow> {
  let mut sorted = rows.to_vec();
  sorted.sort_by(|a, b| {
    b.played_count
      .cmp(&a.played_count)
      .then_with(|| a.player_count.cmp(&b.player_count))
      .then_with(|| a.combination_id.cmp(&b.combination_id))
  });
  sorted.truncate(limit);
  sorted
}

/// How many plays used a given name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCount {
  pub name:  String,
  pub count: usize,
}

/// Appearances of each element across all records, most used first.
///
/// A record counts a name once however often it lists it.
pub fn element_frequency(records: &[PlayRecord]) -> Vec<NameCount> {
  frequency(records.iter().map(|r| r.elements_used.as_slice()))
}

/// Appearances of each optional module across all records, most used first.
pub fn module_frequency(records: &[PlayRecord]) -> Vec<NameCount> {
  frequency(records.iter().map(|r| r.modules_on.as_slice()))
}

fn frequency<'a>(lists: impl Iterator<Item = &'a [String]>) -> Vec<NameCount> {
  // Keyed case-insensitively; the first casing seen is the one reported.
  let mut counts: HashMap<String, NameCount> = HashMap::new();
  for list in lists {
    for name in canonicalize(list) {
      counts
        .entry(name_key(&name))
        .or_insert_with(|| NameCount { name, count: 0 })
        .count += 1;
    }
  }
  let mut out: Vec<NameCount> = counts.into_values().collect();
  out.sort_by(|a, b| {
    b.count
      .cmp(&a.count)
      .then_with(|| name_key(&a.name).cmp(&name_key(&b.name)))
  });
  out
}

/// The last `limit` records, in append order.
pub fn recent(records: &[PlayRecord], limit: usize) -> &[PlayRecord] {
  &records[records.len().saturating_sub(limit)..]
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Every statistic over one snapshot of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
  pub total_plays:              usize,
  pub coverage_by_player_count: Vec<PlayerCountCoverage>,
  pub most_played:              Vec<CoverageRow>,
  pub element_frequency:        Vec<NameCount>,
  pub module_frequency:         Vec<NameCount>,
}

/// Summarise `records` given their coverage `rows`, keeping the `top` most
/// played rows.
pub fn summarize(rows: &[CoverageRow], records: &[PlayRecord], top: usize) -> StatsReport {
  StatsReport {
    total_plays:              records.len(),
    coverage_by_player_count: coverage_by_player_count(rows),
    most_played:              most_played(rows, top),
    element_frequency:        element_frequency(records),
    module_frequency:         module_frequency(records),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::play::NewPlay;

  fn row(id: &str, player_count: u32, played_count: usize) -> CoverageRow {
    CoverageRow {
      combination_id: id.into(),
      player_count,
      profile: None,
      elements_used: vec![],
      played_count,
      last_played: None,
    }
  }

  fn record(elements: &[&str], modules: &[&str]) -> PlayRecord {
    let mut play = NewPlay::new(2, elements.iter().copied());
    play.modules_on = modules.iter().map(|s| (*s).to_owned()).collect();
    play.into_record(Uuid::new_v4(), Utc::now())
  }

  #[test]
  fn coverage_rate_per_player_count() {
    let rows = vec![row("a", 2, 1), row("b", 2, 0), row("c", 2, 3), row("d", 4, 0)];
    let cov = coverage_by_player_count(&rows);
    assert_eq!(cov.len(), 2);
    assert_eq!((cov[0].player_count, cov[0].total, cov[0].played), (2, 3, 2));
    assert!((cov[0].rate - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(cov[1].rate, 0.0);
  }

  #[test]
  fn most_played_orders_and_truncates() {
    let rows = vec![row("b", 3, 2), row("a", 3, 2), row("c", 2, 2), row("d", 2, 5)];
    let top: Vec<_> = most_played(&rows, 3)
      .into_iter()
      .map(|r| r.combination_id)
      .collect();
    assert_eq!(top, vec!["d", "c", "a"]);
    assert!(most_played(&rows, 0).is_empty());
  }

  #[test]
  fn element_frequency_counts_once_per_record() {
    let records = vec![
      record(&["Fog", "Crew", "fog"], &[]),
      record(&["crew", "Tools"], &[]),
      record(&["Fence"], &[]),
    ];
    let freq = element_frequency(&records);
    assert_eq!(
      freq,
      vec![
        NameCount { name: "Crew".into(), count: 2 },
        NameCount { name: "Fence".into(), count: 1 },
        NameCount { name: "Fog".into(), count: 1 },
        NameCount { name: "Tools".into(), count: 1 },
      ]
    );
  }

  #[test]
  fn module_frequency_from_modules_on() {
    let records = vec![record(&[], &["Safe", "Specialists"]), record(&[], &["Safe"])];
    let freq = module_frequency(&records);
    assert_eq!(freq[0], NameCount { name: "Safe".into(), count: 2 });
    assert_eq!(freq.len(), 2);
  }

  #[test]
  fn recent_takes_the_tail() {
    let records: Vec<_> = (0..5).map(|_| record(&["X"], &[])).collect();
    assert_eq!(recent(&records, 2), &records[3..]);
    assert_eq!(recent(&records, 10).len(), 5);
    assert!(recent(&records, 0).is_empty());
  }

  #[test]
  fn summary_counts_every_record() {
    let rows = vec![row("a", 2, 2), row("b", 2, 0), row("c", 3, 1)];
    let records = vec![record(&["X"], &[]), record(&["X", "Y"], &["Safe"])];
    let s = summarize(&rows, &records, 1);
    assert_eq!(s.total_plays, 2);
    assert_eq!(s.most_played.len(), 1);
    assert_eq!(s.most_played[0].combination_id, "a");
    assert_eq!(s.coverage_by_player_count.len(), 2);
    assert_eq!(s.element_frequency[0], NameCount { name: "X".into(), count: 2 });
    assert_eq!(s.module_frequency.len(), 1);
  }
}
