//! TUI rendering: orchestrates all panes.

pub mod detail;
pub mod report_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph, Tabs},
};

use crate::app::{App, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, tab bar, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(1), // tabs
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_tabs(f, rows[1], app);
  draw_body(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " playtest  [r] reload  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{}  {date} ", app.client.base_url()),
    Style::default().fg(Color::Gray),
  );

  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Tabs ─────────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
  let titles: Vec<String> = Tab::ALL
    .iter()
    .enumerate()
    .map(|(i, t)| format!("{} {}", i + 1, t.title()))
    .collect();
  let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
  let tabs = Tabs::new(titles)
    .select(selected)
    .style(Style::default().fg(Color::DarkGray))
    .highlight_style(
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );
  f.render_widget(tabs, area);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  if !app.tab.has_list() {
    detail::draw_stats(f, area, app);
    return;
  }

  // Split into left list pane (45%) and right detail pane (55%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  report_list::draw(f, cols[0], app);
  detail::draw(f, cols[1], app);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = if app.filter_active {
    ("SEARCH", "Type to filter  Esc cancel  Enter done")
  } else if app.tab.has_list() {
    ("NORMAL", "↑↓/jk move  ←→/Tab switch tab  / search  r reload  q quit")
  } else {
    ("STATS", "←→/Tab switch tab  r reload  q quit")
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
