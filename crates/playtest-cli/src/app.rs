//! Dashboard state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use playtest_core::{
  coverage::{CoverageFilter, CoverageRow},
  observed::ObservedCombination,
  play::PlayRecord,
  stats::StatsReport,
};

use crate::client::ApiClient;

/// Plays shown on the log tab.
const RECENT_PLAYS: usize = 20;
/// Rows kept in the most-played table.
const TOP_PLAYED: usize = 15;

// ─── Tab ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  /// Unplayed recommended combinations, in suggestion order.
  Gaps,
  Coverage,
  Observed,
  Stats,
  /// The most recent plays.
  Plays,
}

impl Tab {
  pub const ALL: [Tab; 5] = [Tab::Gaps, Tab::Coverage, Tab::Observed, Tab::Stats, Tab::Plays];

  pub fn title(self) -> &'static str {
    match self {
      Tab::Gaps => "Gaps",
      Tab::Coverage => "Coverage",
      Tab::Observed => "Observed",
      Tab::Stats => "Stats",
      Tab::Plays => "Recent plays",
    }
  }

  fn index(self) -> usize { Self::ALL.iter().position(|t| *t == self).unwrap_or(0) }

  pub fn next(self) -> Self { Self::ALL[(self.index() + 1) % Self::ALL.len()] }

  pub fn prev(self) -> Self {
    Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
  }

  /// Whether the tab shows a selectable list.
  pub fn has_list(self) -> bool { self != Tab::Stats }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level dashboard state.
pub struct App {
  pub tab: Tab,

  pub coverage: Vec<CoverageRow>,
  pub gaps:     Vec<CoverageRow>,
  pub observed: Vec<ObservedCombination>,
  pub stats:    Option<StatsReport>,
  pub plays:    Vec<PlayRecord>,

  /// Current fuzzy-filter string (only edited when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* list of the current tab.
  pub cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      tab: Tab::Gaps,
      coverage: Vec::new(),
      gaps: Vec::new(),
      observed: Vec::new(),
      stats: None,
      plays: Vec::new(),
      filter: String::new(),
      filter_active: false,
      cursor: 0,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch every report from the API.
  pub async fn reload(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading…".into();
    let all = CoverageFilter::default();
    let result = async {
      let coverage = self.client.coverage(&all).await?;
      let gaps = self.client.gaps(&all).await?;
      let observed = self.client.observed().await?;
      let stats = self.client.stats(TOP_PLAYED).await?;
      let plays = self.client.list_plays(Some(RECENT_PLAYS)).await?;
      anyhow::Ok((coverage, gaps, observed, stats, plays))
    }
    .await;

    match result {
      Ok((coverage, gaps, observed, stats, mut plays)) => {
        plays.reverse();
        self.coverage = coverage;
        self.gaps = gaps;
        self.observed = observed;
        self.stats = Some(stats);
        self.plays = plays;
        self.clamp_cursor();
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// The searchable label of every row on the current tab.
  fn labels(&self) -> Vec<String> {
    match self.tab {
      Tab::Gaps => self.gaps.iter().map(|r| r.combination_id.clone()).collect(),
      Tab::Coverage => self.coverage.iter().map(|r| r.combination_id.clone()).collect(),
      Tab::Observed => self.observed.iter().map(|r| r.combination_id.clone()).collect(),
      Tab::Stats => Vec::new(),
      Tab::Plays => self
        .plays
        .iter()
        .map(|p| format!("{} {}", p.play_id, p.elements_used.join(" ")))
        .collect(),
    }
  }

  /// Indices into the current tab's rows that match the filter.
  pub fn visible(&self) -> Vec<usize> {
    let labels = self.labels();
    if self.filter.is_empty() {
      return (0..labels.len()).collect();
    }
    let matcher = SkimMatcherV2::default();
    labels
      .iter()
      .enumerate()
      .filter(|(_, l)| matcher.fuzzy_match(l, &self.filter).is_some())
      .map(|(i, _)| i)
      .collect()
  }

  /// Index of the row under the cursor, if any.
  pub fn selected(&self) -> Option<usize> { self.visible().get(self.cursor).copied() }

  fn clamp_cursor(&mut self) {
    let len = self.visible().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  fn switch_tab(&mut self, tab: Tab) {
    self.tab = tab;
    self.cursor = 0;
    self.filter.clear();
    self.filter_active = false;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.switch_tab(self.tab.next()),
      KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.switch_tab(self.tab.prev()),
      KeyCode::Char(c @ '1'..='5') => {
        let i = c as usize - '1' as usize;
        self.switch_tab(Tab::ALL[i]);
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.visible().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      KeyCode::Char('/') if self.tab.has_list() => {
        self.filter_active = true;
        self.filter.clear();
        self.cursor = 0;
      }

      // A failed reload is shown in the status bar; keep running.
      KeyCode::Char('r') => {
        let _ = self.reload().await;
      }

      _ => {}
    }
    Ok(true)
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.cursor = 0;
      }
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use playtest_core::{
    catalog::Catalog,
    combination::enumerate_recommended,
    coverage::compute_coverage,
  };

  use super::*;
  use crate::client::ApiConfig;

  fn app() -> App {
    let client = ApiClient::new(ApiConfig { base_url: "http://127.0.0.1:1".into() }).unwrap();
    let mut app = App::new(client);
    let catalog = Catalog::default();
    app.gaps = compute_coverage(&catalog, &enumerate_recommended(&catalog), &[]);
    app
  }

  fn press(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  #[test]
  fn tabs_cycle_both_ways() {
    assert_eq!(Tab::Plays.next(), Tab::Gaps);
    assert_eq!(Tab::Gaps.prev(), Tab::Plays);
    for t in Tab::ALL {
      assert_eq!(t.next().prev(), t);
    }
  }

  #[tokio::test]
  async fn filter_narrows_visible_rows() {
    let mut app = app();
    let total = app.visible().len();
    assert!(total > 0);

    app.handle_key(press(KeyCode::Char('/'))).await.unwrap();
    for c in "2P::".chars() {
      app.handle_key(press(KeyCode::Char(c))).await.unwrap();
    }
    app.handle_key(press(KeyCode::Enter)).await.unwrap();
    assert!(!app.filter_active);

    let visible = app.visible();
    assert!(!visible.is_empty() && visible.len() < total);
    assert!(visible.iter().all(|&i| app.gaps[i].player_count == 2));
  }

  #[tokio::test]
  async fn cursor_stays_in_bounds_and_tabs_reset_it() {
    let mut app = app();
    app.handle_key(press(KeyCode::Up)).await.unwrap();
    assert_eq!(app.cursor, 0);
    app.handle_key(press(KeyCode::Down)).await.unwrap();
    assert_eq!(app.selected(), Some(1));

    app.handle_key(press(KeyCode::Char('4'))).await.unwrap();
    assert_eq!(app.tab, Tab::Stats);
    assert_eq!(app.cursor, 0);
    assert_eq!(app.selected(), None);
  }

  #[tokio::test]
  async fn quit_keys() {
    let mut app = app();
    assert!(!app.handle_key(press(KeyCode::Char('q'))).await.unwrap());
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(!app.handle_key(ctrl_c).await.unwrap());
  }
}
