//! `playtest`: log plays and browse coverage from the terminal.
//!
//! # Usage
//!
//! ```
//! playtest log 3 Fog,Crew,Fence,Tools --profile Basic --winner Ana
//! playtest gaps --player-count 2 --includes Fog
//! playtest --url http://localhost:8501 dashboard
//! playtest --config ~/.config/playtest/cli.toml stats
//! ```
//!
//! With no subcommand the interactive dashboard opens.

mod app;
mod client;
mod render;
mod ui;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use playtest_core::{
  coverage::CoverageFilter,
  density,
  play::{Auxiliary, NewPlay},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8501";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "playtest", about = "Playtest coverage tracker client")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the playtest server (default: http://localhost:8501).
  #[arg(long, env = "PLAYTEST_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Record a completed play.
  Log(LogArgs),
  /// List logged plays, oldest first.
  Plays {
    /// Show only the most recent N plays.
    #[arg(long)]
    limit: Option<usize>,
  },
  /// Every recommended combination with its play count.
  Coverage(FilterArgs),
  /// Recommended combinations not yet played.
  Gaps(FilterArgs),
  /// The next combination to play.
  Suggest(FilterArgs),
  /// Every distinct combination actually played.
  Observed,
  /// Coverage rates and frequency tables.
  Stats {
    /// Rows in the most-played table.
    #[arg(long, default_value_t = 15)]
    top: usize,
  },
  /// Compare an element count with the recommended size.
  Density {
    player_count:  u32,
    element_count: usize,
  },
  /// Interactive dashboard (the default).
  Dashboard,
}

#[derive(ClapArgs, Debug)]
struct LogArgs {
  player_count: u32,

  /// Elements used, comma-separated.
  #[arg(value_delimiter = ',', required = true)]
  elements: Vec<String>,

  /// Ruleset profile.
  #[arg(long)]
  profile: Option<String>,

  /// Optional modules turned on, comma-separated.
  #[arg(long, value_delimiter = ',')]
  modules: Vec<String>,

  #[arg(long)]
  winner: Option<String>,

  #[arg(long)]
  notes: Option<String>,

  /// At least one player was new to the game.
  #[arg(long)]
  first_play: bool,
}

impl From<LogArgs> for NewPlay {
  fn from(a: LogArgs) -> Self {
    let mut play = NewPlay::new(a.player_count, a.elements);
    play.profile = a.profile;
    play.modules_on = a.modules;
    play.auxiliary = Auxiliary {
      winner: a.winner,
      notes: a.notes,
      first_play: a.first_play,
      ..Auxiliary::default()
    };
    play
  }
}

#[derive(ClapArgs, Debug)]
struct FilterArgs {
  /// Only these player counts, comma-separated.
  #[arg(long, value_delimiter = ',')]
  player_count: Vec<u32>,

  /// Only these profiles, comma-separated.
  #[arg(long, value_delimiter = ',')]
  profile: Vec<String>,

  /// Only combinations that include this element.
  #[arg(long)]
  includes: Option<String>,
}

impl From<FilterArgs> for CoverageFilter {
  fn from(a: FilterArgs) -> Self {
    CoverageFilter {
      player_counts: a.player_count,
      profiles:      a.profile,
      must_include:  a.includes,
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  let client = ApiClient::new(api_config)?;

  match args.command.unwrap_or(Command::Dashboard) {
    Command::Log(log) => {
      let record = client.log_play(&NewPlay::from(log)).await?;
      println!("logged play {}", record.play_id);
      let catalog = client.catalog().await?;
      let counted = catalog.counted_elements(&record.elements_used);
      let pc = record.player_count.unwrap_or_default();
      println!("{}", render::density_line(&density::report(&catalog, pc, counted)));
    }
    Command::Plays { limit } => {
      print!("{}", render::plays_table(&client.list_plays(limit).await?));
    }
    Command::Coverage(f) => {
      print!("{}", render::coverage_table(&client.coverage(&f.into()).await?));
    }
    Command::Gaps(f) => {
      let gaps = client.gaps(&f.into()).await?;
      print!("{}", render::coverage_table(&gaps));
      println!("{} unplayed", gaps.len());
    }
    Command::Suggest(f) => {
      let next = client.suggestion(&f.into()).await?;
      println!("{}", render::suggestion_line(next.as_ref()));
    }
    Command::Observed => {
      print!("{}", render::observed_table(&client.observed().await?));
    }
    Command::Stats { top } => {
      print!("{}", render::stats_text(&client.stats(top).await?));
    }
    Command::Density { player_count, element_count } => {
      println!("{}", render::density_line(&client.density(player_count, element_count).await?));
    }
    Command::Dashboard => run_dashboard(client).await?,
  }
  Ok(())
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

async fn run_dashboard(client: ApiClient) -> Result<()> {
  let mut app = App::new(client);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Load initial data.
  let load_result = app.reload().await;

  // Run the event loop; restore terminal even on error.
  let run_result = if load_result.is_ok() {
    run_event_loop(&mut terminal, &mut app).await
  } else {
    load_result
  };

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
