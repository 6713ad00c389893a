//! Plain-text rendering of reports for the one-shot subcommands.

use chrono::{DateTime, Utc};
use playtest_core::{
  combination::Combination,
  coverage::CoverageRow,
  density::DensityReport,
  observed::ObservedCombination,
  play::PlayRecord,
  stats::{NameCount, StatsReport},
};

pub fn timestamp(dt: &DateTime<Utc>) -> String { dt.format("%Y-%m-%d %H:%M").to_string() }

/// Left-aligned columns separated by two spaces, with a header row.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
  let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
  for row in rows {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let mut out = table_line(headers.iter().copied(), &widths);
  for row in rows {
    out.push_str(&table_line(row.iter().map(String::as_str), &widths));
  }
  out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
  let padded: Vec<String> = cells
    .zip(widths)
    .map(|(c, &w)| format!("{c:<w$}"))
    .collect();
  let mut line = padded.join("  ").trim_end().to_string();
  line.push('\n');
  line
}

fn or_dash(s: Option<&str>) -> String { s.unwrap_or("-").to_string() }

pub fn coverage_table(rows: &[CoverageRow]) -> String {
  let body: Vec<Vec<String>> = rows
    .iter()
    .map(|r| {
      vec![
        r.combination_id.clone(),
        r.player_count.to_string(),
        or_dash(r.profile.as_deref()),
        r.played_count.to_string(),
        r.last_played.as_ref().map_or_else(|| "never".into(), timestamp),
      ]
    })
    .collect();
  table(&["COMBINATION", "PLAYERS", "PROFILE", "PLAYS", "LAST PLAYED"], &body)
}

pub fn observed_table(rows: &[ObservedCombination]) -> String {
  let body: Vec<Vec<String>> = rows
    .iter()
    .map(|r| {
      vec![
        r.combination_id.clone(),
        r.suit_count.to_string(),
        r.played_count.to_string(),
        r.density.to_string(),
        timestamp(&r.last_played),
      ]
    })
    .collect();
  table(&["COMBINATION", "SUITS", "PLAYS", "DENSITY", "LAST PLAYED"], &body)
}

pub fn plays_table(records: &[PlayRecord]) -> String {
  let body: Vec<Vec<String>> = records
    .iter()
    .map(|r| {
      vec![
        timestamp(&r.recorded_at),
        r.player_count.map_or_else(|| "?".into(), |p| p.to_string()),
        or_dash(r.profile.as_deref()),
        r.elements_used.join(", "),
        or_dash(r.auxiliary.winner.as_deref()),
      ]
    })
    .collect();
  table(&["RECORDED", "PLAYERS", "PROFILE", "ELEMENTS", "WINNER"], &body)
}

pub fn suggestion_line(next: Option<&Combination>) -> String {
  match next {
    Some(c) => format!(
      "next: {} players{}: {}",
      c.player_count,
      c.profile.as_deref().map(|p| format!(" ({p})")).unwrap_or_default(),
      c.elements.join(", ")
    ),
    None => "every recommended combination has been played".to_string(),
  }
}

pub fn density_line(r: &DensityReport) -> String {
  match r.recommended {
    Some(size) => format!(
      "{} elements at {} players: {} (recommended {size})",
      r.element_count, r.player_count, r.density
    ),
    None => format!("no recommended size for {} players", r.player_count),
  }
}

fn frequency_table(title: &str, counts: &[NameCount]) -> String {
  let body: Vec<Vec<String>> = counts
    .iter()
    .map(|c| vec![c.name.clone(), c.count.to_string()])
    .collect();
  table(&[title, "PLAYS"], &body)
}

pub fn stats_text(s: &StatsReport) -> String {
  let mut out = format!("{} plays logged\n\n", s.total_plays);

  let cov: Vec<Vec<String>> = s
    .coverage_by_player_count
    .iter()
    .map(|c| {
      vec![
        c.player_count.to_string(),
        format!("{}/{}", c.played, c.total),
        format!("{:.1}%", c.rate * 100.0),
      ]
    })
    .collect();
  out.push_str(&table(&["PLAYERS", "PLAYED", "RATE"], &cov));

  let played: Vec<CoverageRow> =
    s.most_played.iter().filter(|r| r.is_played()).cloned().collect();
  if !played.is_empty() {
    out.push('\n');
    out.push_str(&coverage_table(&played));
  }
  if !s.element_frequency.is_empty() {
    out.push('\n');
    out.push_str(&frequency_table("ELEMENT", &s.element_frequency));
  }
  if !s.module_frequency.is_empty() {
    out.push('\n');
    out.push_str(&frequency_table("MODULE", &s.module_frequency));
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use playtest_core::{density::DensityLabel, play::NewPlay, stats::PlayerCountCoverage};
  use uuid::Uuid;

  use super::*;

  #[test]
  fn table_pads_columns() {
    let out = table(
      &["A", "LONG"],
      &[vec!["xyz".into(), "1".into()], vec!["q".into(), "22".into()]],
    );
    assert_eq!(out, "A    LONG\nxyz  1\nq    22\n");
  }

  #[test]
  fn unplayed_rows_say_never() {
    let row = CoverageRow {
      combination_id: "2P::a|b".into(),
      player_count:   2,
      profile:        None,
      elements_used:  vec!["a".into(), "b".into()],
      played_count:   0,
      last_played:    None,
    };
    let out = coverage_table(&[row]);
    assert!(out.lines().nth(1).unwrap().ends_with("never"));
    assert!(out.contains("2P::a|b"));
  }

  #[test]
  fn plays_show_unknown_player_count() {
    let mut rec = NewPlay::new(3, ["Fog", "Crew"])
      .into_record(Uuid::nil(), Utc.with_ymd_and_hms(2024, 5, 1, 20, 15, 0).unwrap());
    rec.player_count = None;
    let out = plays_table(&[rec]);
    let row = out.lines().nth(1).unwrap();
    assert!(row.starts_with("2024-05-01 20:15  ?"));
    assert!(row.contains("Fog, Crew"));
  }

  #[test]
  fn suggestion_and_density_lines() {
    let c = Combination::new(3, Some("Basic".into()), ["Fog", "Crew"]);
    assert_eq!(suggestion_line(Some(&c)), "next: 3 players (Basic): Crew, Fog");
    assert!(suggestion_line(None).starts_with("every"));

    let r = DensityReport {
      player_count:  4,
      element_count: 7,
      recommended:   Some(6),
      density:       DensityLabel::Over(1),
    };
    assert_eq!(density_line(&r), "7 elements at 4 players: over by 1 (recommended 6)");
  }

  #[test]
  fn stats_skip_empty_sections() {
    let s = StatsReport {
      total_plays:              0,
      coverage_by_player_count: vec![PlayerCountCoverage {
        player_count: 2,
        total:        3,
        played:       0,
        rate:         0.0,
      }],
      most_played:              vec![],
      element_frequency:        vec![],
      module_frequency:         vec![],
    };
    let out = stats_text(&s);
    assert!(out.starts_with("0 plays logged"));
    assert!(out.contains("0/3"));
    assert!(!out.contains("ELEMENT"));
  }
}
