//! Row list pane, left panel of every list tab.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
  app::{App, Tab},
  render::timestamp,
};

/// One list line for row `i` of the current tab: label and a dim suffix.
fn row_line(app: &App, i: usize) -> (String, String) {
  match app.tab {
    Tab::Gaps => (app.gaps[i].combination_id.clone(), String::new()),
    Tab::Coverage => {
      let r = &app.coverage[i];
      (r.combination_id.clone(), format!("×{}", r.played_count))
    }
    Tab::Observed => {
      let r = &app.observed[i];
      (r.combination_id.clone(), format!("×{}  {}", r.played_count, r.density))
    }
    Tab::Plays => {
      let p = &app.plays[i];
      let pc = p.player_count.map_or_else(|| "?".to_string(), |n| n.to_string());
      (timestamp(&p.recorded_at), format!("{pc}P  {}", p.elements_used.join(", ")))
    }
    Tab::Stats => (String::new(), String::new()),
  }
}

fn total(app: &App) -> usize {
  match app.tab {
    Tab::Gaps => app.gaps.len(),
    Tab::Coverage => app.coverage.len(),
    Tab::Observed => app.observed.len(),
    Tab::Plays => app.plays.len(),
    Tab::Stats => 0,
  }
}

/// Render the current tab's rows into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible();
  let total = total(app);

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" {} ({}/{}) ", app.tab.title(), visible.len(), total)
  } else {
    format!(" {} ({}) ", app.tab.title(), total)
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = visible
    .iter()
    .map(|&i| {
      let (label, suffix) = row_line(app, i);
      ListItem::new(Line::from(vec![
        Span::raw(label),
        Span::styled(format!("  {suffix}"), Style::default().fg(Color::DarkGray)),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Filter bar at the bottom of the inner area.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if visible.is_empty() {
    let empty = if total == 0 && app.tab == Tab::Gaps {
      "Every recommended combination has been played."
    } else {
      "Nothing to show."
    };
    f.render_widget(
      Paragraph::new(empty).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner_area,
    &mut state,
  );
}
