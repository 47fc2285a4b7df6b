//! TubeTUI - terminal client for searching and playing YouTube videos
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! tubetui
//!
//! # CLI mode (for automation)
//! tubetui search "rust async" --json
//! tubetui channel UC_x5XG1OV2P6uZZ5FSM9Ttw --limit 6
//! tubetui play dQw4w9WgXcQ --player browser
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::oneshot;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tubetui::app::{
    Action, App, InputMode, LoadingState, Pane, RecommendationTicket, SearchTicket,
    CHANNEL_FETCH_LIMIT, SEARCH_FAILED_NOTICE, SEARCH_LIMIT,
};
use tubetui::cli::{Cli, Command, ExitCode, Output};
use tubetui::commands;
use tubetui::config::Config;
use tubetui::models::VideoSummary;
use tubetui::player::{Player, PlayerKind};
use tubetui::ui::Theme;
use tubetui::{YouTubeClient, YouTubeError};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Fallback startup query when the config does not set one
const DEFAULT_QUERY: &str = "rust programming";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        run_tui().await
    }
}

/// Route diagnostics to a file; the TUI owns the terminal
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::cache_dir()?.join("tubetui");
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::never(dir, "tubetui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tubetui=info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &output).await,
        Some(Command::Channel(cmd)) => commands::channel_cmd(cmd, &output).await,
        Some(Command::Related(cmd)) => commands::related_cmd(cmd, &output).await,
        Some(Command::Url(cmd)) => commands::url_cmd(cmd, &output).await,
        Some(Command::Play(cmd)) => commands::play_cmd(cmd, &output).await,
        // Unreachable: is_cli_mode() gates on Some
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui() -> Result<()> {
    let config = Config::load();
    let api_key = config
        .require_api_key()
        .context("cannot start without an API key")?;
    let client = Arc::new(YouTubeClient::new(api_key));
    let player_kind = PlayerKind::from_config(config.preferred_player.as_deref());

    let mut app = App::new();
    let mut pending = Pending::default();

    // Populate the screen with an initial search
    let startup_query = config
        .default_query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_QUERY)
        .to_string();
    app.query = startup_query.clone();
    app.cursor = app.query.len();
    if let Some(ticket) = app.begin_search_for(startup_query) {
        spawn_search(&client, ticket, &mut pending);
    }

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &client, player_kind, &mut pending).await;
    restore_terminal(&mut terminal)?;
    result
}

// =============================================================================
// Async fetches
// =============================================================================

type FetchResult = Result<Vec<VideoSummary>, YouTubeError>;

/// In-flight fetches, each tagged with its request key so responses can
/// be matched against the controller's current state
#[derive(Default)]
struct Pending {
    search: Option<(u64, oneshot::Receiver<FetchResult>)>,
    recommendations: Option<(String, oneshot::Receiver<FetchResult>)>,
    playback: Option<(String, oneshot::Receiver<bool>)>,
}

fn spawn_search(client: &Arc<YouTubeClient>, ticket: SearchTicket, pending: &mut Pending) {
    let (tx, rx) = oneshot::channel();
    let client = Arc::clone(client);
    tokio::spawn(async move {
        let _ = tx.send(client.search_videos(&ticket.query, SEARCH_LIMIT).await);
    });
    pending.search = Some((ticket.epoch, rx));
}

fn spawn_recommendations(
    client: &Arc<YouTubeClient>,
    ticket: RecommendationTicket,
    pending: &mut Pending,
) {
    let (tx, rx) = oneshot::channel();
    let client = Arc::clone(client);
    let channel_id = ticket.channel_id.clone();
    tokio::spawn(async move {
        let _ = tx.send(client.channel_videos(&channel_id, CHANNEL_FETCH_LIMIT).await);
    });
    pending.recommendations = Some((ticket.video_id, rx));
}

fn spawn_playback(video: &VideoSummary, kind: PlayerKind, pending: &mut Pending) {
    let (tx, rx) = oneshot::channel();
    let video_id = video.id.clone();
    tokio::spawn(async move {
        let player = Player::new(kind);
        match player.play(&video_id).await {
            Ok(Some(mut child)) => {
                let clean = child.wait().await.map(|s| s.success()).unwrap_or(false);
                let _ = tx.send(clean);
            }
            Ok(None) => {
                // Browser handoff: no process to observe, no ended event
            }
            Err(e) => {
                warn!(%video_id, "playback failed: {}", e);
            }
        }
    });
    pending.playback = Some((video.id.clone(), rx));
}

/// Poll outstanding fetches and feed completed ones to the controller.
///
/// The controller re-validates every response against its current
/// epoch / selected video, so anything that completes late for an
/// abandoned request is discarded there.
fn check_pending(app: &mut App, client: &Arc<YouTubeClient>, pending: &mut Pending) {
    if let Some((epoch, mut rx)) = pending.search.take() {
        match rx.try_recv() {
            Ok(outcome) => {
                if let Some(ticket) = app.apply_search(epoch, outcome) {
                    spawn_recommendations(client, ticket, pending);
                }
            }
            Err(oneshot::error::TryRecvError::Empty) => {
                pending.search = Some((epoch, rx));
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                warn!(epoch, "search task dropped its result channel");
                app.loading = LoadingState::Idle;
                app.set_error(SEARCH_FAILED_NOTICE);
            }
        }
    }

    if let Some((video_id, mut rx)) = pending.recommendations.take() {
        match rx.try_recv() {
            Ok(outcome) => app.apply_recommendations(&video_id, outcome),
            Err(oneshot::error::TryRecvError::Empty) => {
                pending.recommendations = Some((video_id, rx));
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                // Soft failure, same as a failed fetch: no surfaced error
                warn!(%video_id, "recommendation task dropped its result channel");
            }
        }
    }

    if let Some((video_id, mut rx)) = pending.playback.take() {
        match rx.try_recv() {
            Ok(clean) => {
                if clean {
                    if let Some(ticket) = app.watch_next() {
                        spawn_recommendations(client, ticket, pending);
                    }
                }
            }
            Err(oneshot::error::TryRecvError::Empty) => {
                pending.playback = Some((video_id, rx));
            }
            Err(oneshot::error::TryRecvError::Closed) => {}
        }
    }
}

/// Main event loop - handles input, polls fetches, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    client: &Arc<YouTubeClient>,
    player_kind: PlayerKind,
    pending: &mut Pending,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        terminal.draw(|frame| render_ui(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key) {
                        Action::Search(ticket) => spawn_search(client, ticket, pending),
                        Action::FetchRecommendations(ticket) => {
                            spawn_recommendations(client, ticket, pending)
                        }
                        Action::Play(video) => spawn_playback(&video, player_kind, pending),
                        Action::None => {}
                    }
                }
            }
        }

        check_pending(app, client, pending);
    }

    Ok(())
}

// =============================================================================
// UI Rendering
// =============================================================================

/// Main render function
fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    // Main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

/// Render the header with logo and search box
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14), // Logo
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            "TUBE",
            ratatui::style::Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "TUI",
            ratatui::style::Style::default()
                .fg(Theme::SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, header_chunks[0]);

    let editing = app.input_mode == InputMode::Editing;
    let search_style = if editing {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let search_text = if editing {
        let cursor = app.cursor.min(app.query.len());
        let (before, after) = app.query.split_at(cursor);
        format!("⌕ {}│{}", before, after)
    } else if app.query.is_empty() {
        "⌕ Type / to search...".to_string()
    } else {
        format!("⌕ {}", app.query)
    };

    let search_box = Paragraph::new(search_text)
        .style(if editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(search_style)
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(search_box, header_chunks[1]);
}

/// Results on the left, selected video and recommendations on the right
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_results(frame, panes[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(6)])
        .split(panes[1]);

    render_selected(frame, right[0], app);
    render_recommendations(frame, right[1], app);
}

/// Render the search results list
fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Pane::Results;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(
            format!(" RESULTS ({}) ", app.selection.results.len()),
            Theme::title(),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.loading.is_loading() {
        let loading = Paragraph::new("⟳ Searching...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if app.selection.results.is_empty() {
        let empty = Paragraph::new(if app.query.is_empty() {
            "Type / to search for videos..."
        } else {
            "No results found"
        })
        .style(Theme::dimmed())
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let items = video_list_items(
        &app.selection.results,
        app.results_list.selected,
        app.selection.selected.as_ref(),
    );
    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

/// Render the selected video detail pane
fn render_selected(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" NOW SELECTED ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(ref video) = app.selection.selected else {
        let empty = Paragraph::new("Nothing selected")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    };

    let detail = Paragraph::new(vec![
        Line::from(Span::styled(
            video.title.clone(),
            ratatui::style::Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(video.channel_title.clone(), Theme::channel())),
        Line::from(""),
        Line::from(Span::styled(video.description.clone(), Theme::text())),
        Line::from(""),
        Line::from(Span::styled(video.watch_url(), Theme::dimmed())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  o  ", Theme::keybind()),
            Span::styled(" Play  ", Theme::dimmed()),
            Span::styled(" TAB ", Theme::keybind()),
            Span::styled(" Recommendations", Theme::dimmed()),
        ]),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(detail, inner);
}

/// Render the same-channel recommendations pane
fn render_recommendations(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Pane::Recommendations;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(
            format!(" MORE FROM THIS CHANNEL ({}) ", app.selection.recommendations.len()),
            Theme::title(),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.selection.recommendations.is_empty() {
        let empty = Paragraph::new("No recommendations")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let items = video_list_items(
        &app.selection.recommendations,
        app.rec_list.selected,
        app.selection.selected.as_ref(),
    );
    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

/// Shared list rendering for results and recommendations
fn video_list_items<'a>(
    videos: &'a [VideoSummary],
    highlighted: usize,
    selected: Option<&'a VideoSummary>,
) -> Vec<ListItem<'a>> {
    videos
        .iter()
        .enumerate()
        .map(|(i, video)| {
            let is_highlighted = i == highlighted;
            let is_selected = selected.map(|s| s.id == video.id).unwrap_or(false);
            let marker = if is_highlighted { "▸ " } else { "  " };
            let playing = if is_selected { "▶ " } else { "" };

            let line = Line::from(vec![
                Span::styled(
                    marker,
                    if is_highlighted {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(playing, Theme::success()),
                Span::styled(
                    &video.title,
                    if is_highlighted {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::raw(" "),
                Span::styled(&video.channel_title, Theme::channel()),
            ]);

            ListItem::new(line)
        })
        .collect()
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::ACCENT),
        ),
    };

    let pane_indicator = Span::styled(
        match app.focus {
            Pane::Results => " RESULTS ",
            Pane::Recommendations => " RECOMMENDATIONS ",
        },
        ratatui::style::Style::default().fg(Theme::DIM),
    );

    let help = Span::styled(" q:quit  /:search  ↵:select  o:play ", Theme::dimmed());

    let status_line = Line::from(vec![
        mode_indicator,
        pane_indicator,
        Span::raw(" │ "),
        help,
    ]);

    frame.render_widget(Paragraph::new(status_line).style(Theme::status_bar()), area);
}

/// Render error popup overlay
fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}
