//! TubeTUI - terminal client for searching and playing YouTube videos
//!
//! Search YouTube from the terminal, pick a result, play it in mpv or
//! the browser, and get same-channel recommendations alongside.
//!
//! # Modules
//!
//! - `models` - Normalized video data structures
//! - `api` - YouTube search API client
//! - `app` - Selection controller and TUI state
//! - `config` - Config file and API key handling
//! - `cli` / `commands` - Scriptable CLI mode
//! - `player` - External playback (mpv / browser)
//! - `ui` - TUI theme

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod player;
pub mod ui;

// Re-export commonly used types
pub use api::{ApiError, YouTubeClient, YouTubeError};
pub use app::{
    Action, App, InputMode, LoadingState, Pane, RecommendationTicket, SearchTicket,
    SelectionState,
};
pub use config::{Config, ConfigError};
pub use models::VideoSummary;
pub use player::{Player, PlayerKind};
