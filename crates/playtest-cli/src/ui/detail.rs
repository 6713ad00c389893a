//! Detail pane (right panel) and the full-width stats view.

use playtest_core::stats::NameCount;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
  app::{App, Tab},
  render::timestamp,
};

const BAR_WIDTH: usize = 24;

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<12}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value.into()),
  ])
}

fn elements(names: &[String]) -> Vec<Line<'static>> {
  names.iter().map(|n| Line::from(format!("  • {n}"))).collect()
}

fn bordered(title: String) -> Block<'static> {
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

// ─── Row detail ───────────────────────────────────────────────────────────────

/// Render the row under the cursor into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = bordered(" Detail ".into());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(i) = app.selected() else {
    f.render_widget(
      Paragraph::new("No row selected.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let mut lines = Vec::new();
  match app.tab {
    Tab::Gaps | Tab::Coverage => {
      let r = if app.tab == Tab::Gaps { &app.gaps[i] } else { &app.coverage[i] };
      lines.push(field("players", r.player_count.to_string()));
      if let Some(p) = &r.profile {
        lines.push(field("profile", p.clone()));
      }
      lines.push(field("plays", r.played_count.to_string()));
      lines.push(field(
        "last played",
        r.last_played.as_ref().map_or_else(|| "never".into(), timestamp),
      ));
      lines.push(Line::from(""));
      lines.extend(elements(&r.elements_used));
    }
    Tab::Observed => {
      let r = &app.observed[i];
      lines.push(field("players", r.player_count.to_string()));
      if let Some(p) = &r.profile {
        lines.push(field("profile", p.clone()));
      }
      lines.push(field("suits", r.suit_count.to_string()));
      lines.push(field("density", r.density.to_string()));
      lines.push(field("plays", r.played_count.to_string()));
      lines.push(field("last played", timestamp(&r.last_played)));
      lines.push(Line::from(""));
      lines.extend(elements(&r.elements_used));
    }
    Tab::Plays => {
      let p = &app.plays[i];
      lines.push(field("play id", p.play_id.to_string()));
      lines.push(field("recorded", timestamp(&p.recorded_at)));
      lines.push(field(
        "players",
        p.player_count.map_or_else(|| "unknown".into(), |n| n.to_string()),
      ));
      if let Some(pr) = &p.profile {
        lines.push(field("profile", pr.clone()));
      }
      if !p.modules_on.is_empty() {
        lines.push(field("modules", p.modules_on.join(", ")));
      }
      if let Some(w) = &p.auxiliary.winner {
        lines.push(field("winner", w.clone()));
      }
      if let Some(n) = &p.auxiliary.notes {
        lines.push(field("notes", n.clone()));
      }
      lines.push(Line::from(""));
      lines.extend(elements(&p.elements_used));
    }
    Tab::Stats => {}
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ─── Stats ────────────────────────────────────────────────────────────────────

fn bar(fraction: f64) -> String {
  let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
  format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn frequency_lines(title: &str, counts: &[NameCount]) -> Vec<Line<'static>> {
  let max = counts.iter().map(|c| c.count).max().unwrap_or(0).max(1);
  let mut lines = vec![Line::from(Span::styled(
    title.to_string(),
    Style::default().add_modifier(Modifier::BOLD),
  ))];
  for c in counts {
    lines.push(Line::from(vec![
      Span::raw(format!("  {:<16}", c.name)),
      Span::styled(bar(c.count as f64 / max as f64), Style::default().fg(Color::Blue)),
      Span::raw(format!(" {}", c.count)),
    ]));
  }
  lines
}

/// Render the stats tab across the whole body.
pub fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
  let block = bordered(" Stats ".into());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(s) = &app.stats else {
    f.render_widget(
      Paragraph::new("Not loaded yet. Press r.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let mut lines = vec![
    field("plays", s.total_plays.to_string()),
    Line::from(""),
    Line::from(Span::styled(
      "Coverage by player count",
      Style::default().add_modifier(Modifier::BOLD),
    )),
  ];
  for c in &s.coverage_by_player_count {
    lines.push(Line::from(vec![
      Span::raw(format!("  {}P  ", c.player_count)),
      Span::styled(bar(c.rate), Style::default().fg(Color::Green)),
      Span::raw(format!(" {}/{} ({:.1}%)", c.played, c.total, c.rate * 100.0)),
    ]));
  }

  let played: Vec<_> = s.most_played.iter().filter(|r| r.is_played()).collect();
  if !played.is_empty() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      "Most played",
      Style::default().add_modifier(Modifier::BOLD),
    )));
    for r in played {
      lines.push(Line::from(format!("  {:>3}×  {}", r.played_count, r.combination_id)));
    }
  }
  if !s.element_frequency.is_empty() {
    lines.push(Line::from(""));
    lines.extend(frequency_lines("Element frequency", &s.element_frequency));
  }
  if !s.module_frequency.is_empty() {
    lines.push(Line::from(""));
    lines.extend(frequency_lines("Module frequency", &s.module_frequency));
  }

  f.render_widget(Paragraph::new(lines), inner);
}
