//! App state and the selection controller
//!
//! Owns the three pieces of application state (result list, selected
//! video, recommendation list) and the rules for deriving one from
//! another. The controller is synchronous and single-writer: network
//! fetches run elsewhere and hand their outcome back through
//! `apply_search` / `apply_recommendations`, each of which validates
//! that the response still matches the most recent request for its
//! logical key before committing anything.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, error, warn};

use crate::api::YouTubeError;
use crate::models::VideoSummary;

/// Results requested from a primary search
pub const SEARCH_LIMIT: u32 = 5;
/// Videos fetched from the selected video's channel
pub const CHANNEL_FETCH_LIMIT: u32 = 6;
/// Recommendations kept after filtering out the selected video
pub const RECOMMENDATION_CAP: usize = 4;

/// Notice shown when the primary search fails; the underlying cause is
/// logged, never surfaced
pub const SEARCH_FAILED_NOTICE: &str = "Search failed. Please check your API key.";

// =============================================================================
// Selection State
// =============================================================================

/// The complete in-memory selection state: current results, the selected
/// video, and its same-channel recommendations. Replaced wholesale on
/// every transition, never mutated in place by anything but the
/// controller.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Search results in upstream relevance order
    pub results: Vec<VideoSummary>,
    /// Currently selected (playing) video
    pub selected: Option<VideoSummary>,
    /// Same-channel recommendations for the selected video, capped at
    /// [`RECOMMENDATION_CAP`]
    pub recommendations: Vec<VideoSummary>,
}

/// Handle for one in-flight search; the epoch ties the eventual response
/// to the request that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub epoch: u64,
    pub query: String,
}

/// Handle for one in-flight recommendation fetch, keyed by the video
/// that was selected when it was issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationTicket {
    pub video_id: String,
    pub channel_id: String,
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for the primary search
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }
}

// =============================================================================
// List State
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently highlighted index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    /// Move highlight up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move highlight down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Update length and clamp the highlight into range
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Reset highlight to the first item
    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

// =============================================================================
// Focus
// =============================================================================

/// Which list pane keyboard navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Results,
    Recommendations,
}

// =============================================================================
// Actions
// =============================================================================

/// Side effect requested by a state transition; the event loop turns
/// these into spawned fetches or playback
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    /// Run a primary search for this ticket
    Search(SearchTicket),
    /// Fetch same-channel recommendations for this ticket
    FetchRecommendations(RecommendationTicket),
    /// Open the video in an external player
    Play(VideoSummary),
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Search query being edited
    pub query: String,
    /// Cursor position in the query
    pub cursor: usize,
    /// Results / selection / recommendations
    pub selection: SelectionState,
    /// Highlight state for the results pane
    pub results_list: ListState,
    /// Highlight state for the recommendations pane
    pub rec_list: ListState,
    /// Which pane navigation targets
    pub focus: Pane,
    /// Primary search loading state
    pub loading: LoadingState,
    /// User-visible error message
    pub error: Option<String>,
    /// Monotonic id of the most recent search request
    search_epoch: u64,
}

impl Default for App {
    fn default() -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            query: String::new(),
            cursor: 0,
            selection: SelectionState::default(),
            results_list: ListState::default(),
            rec_list: ListState::default(),
            focus: Pane::Results,
            loading: LoadingState::default(),
            error: None,
            search_epoch: 0,
        }
    }
}

impl App {
    /// Create a new App instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set the user-visible error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Clear the user-visible error message
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // -------------------------------------------------------------------------
    // Search transitions
    // -------------------------------------------------------------------------

    /// Start a search for the query currently in the input box.
    ///
    /// Returns `None` without changing state when the trimmed query is
    /// empty. Otherwise enters the loading state, clears any previous
    /// error, and hands back a ticket for the fetch.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return None;
        }
        self.begin_search_for(query)
    }

    /// Start a search for an explicit, already-trimmed query
    pub fn begin_search_for(&mut self, query: String) -> Option<SearchTicket> {
        debug_assert!(!query.trim().is_empty());
        self.loading = LoadingState::Loading;
        self.error = None;
        self.search_epoch += 1;
        Some(SearchTicket {
            epoch: self.search_epoch,
            query,
        })
    }

    /// Commit the outcome of a search fetch.
    ///
    /// A response whose epoch is no longer the most recent one is
    /// discarded. On success the result list is replaced wholesale and
    /// the first result (if any) is auto-selected, which yields a
    /// recommendation ticket. On failure prior results and selection are
    /// left untouched and a generic notice is surfaced.
    pub fn apply_search(
        &mut self,
        epoch: u64,
        outcome: Result<Vec<VideoSummary>, YouTubeError>,
    ) -> Option<RecommendationTicket> {
        if epoch != self.search_epoch {
            debug!(epoch, current = self.search_epoch, "discarding stale search response");
            return None;
        }
        self.loading = LoadingState::Idle;

        match outcome {
            Ok(results) => {
                self.results_list.set_len(results.len());
                self.results_list.reset();
                self.focus = Pane::Results;
                self.selection.results = results;

                match self.selection.results.first().cloned() {
                    Some(first) => Some(self.select(first)),
                    None => {
                        self.selection.selected = None;
                        self.selection.recommendations.clear();
                        self.rec_list.set_len(0);
                        None
                    }
                }
            }
            Err(e) => {
                error!(cause = %e.cause(), "{}", e);
                self.set_error(SEARCH_FAILED_NOTICE);
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Selection transitions
    // -------------------------------------------------------------------------

    /// Select a video and request recommendations for it.
    ///
    /// The selection itself is synchronous; the returned ticket asks the
    /// caller to fetch the channel's videos. Re-selecting the current
    /// video is a no-op for the selection but still re-issues the fetch,
    /// since upstream content may have changed.
    pub fn select(&mut self, video: VideoSummary) -> RecommendationTicket {
        let ticket = RecommendationTicket {
            video_id: video.id.clone(),
            channel_id: video.channel_id.clone(),
        };
        self.selection.selected = Some(video);
        ticket
    }

    /// Select the highlighted entry of the focused pane
    pub fn select_highlighted(&mut self) -> Option<RecommendationTicket> {
        let video = match self.focus {
            Pane::Results => self.selection.results.get(self.results_list.selected),
            Pane::Recommendations => self.selection.recommendations.get(self.rec_list.selected),
        }
        .cloned()?;
        Some(self.select(video))
    }

    /// Commit the outcome of a recommendation fetch.
    ///
    /// Responses for a video that is no longer selected are discarded,
    /// so an older fetch can never overwrite the recommendations of a
    /// newer selection. The channel set is filtered so the selected
    /// video never recommends itself, then capped, order preserved.
    /// Failure degrades to an empty list and is logged only.
    pub fn apply_recommendations(
        &mut self,
        video_id: &str,
        outcome: Result<Vec<VideoSummary>, YouTubeError>,
    ) {
        let current = self.selection.selected.as_ref().map(|v| v.id.as_str());
        if current != Some(video_id) {
            debug!(video_id, "discarding stale recommendation response");
            return;
        }

        match outcome {
            Ok(videos) => {
                let recommendations: Vec<VideoSummary> = videos
                    .into_iter()
                    .filter(|v| v.id != video_id)
                    .take(RECOMMENDATION_CAP)
                    .collect();
                self.rec_list.set_len(recommendations.len());
                self.rec_list.reset();
                self.selection.recommendations = recommendations;
            }
            Err(e) => {
                warn!(video_id, cause = %e.cause(), "{}", e);
                self.selection.recommendations.clear();
                self.rec_list.set_len(0);
            }
        }
    }

    /// Advance to the first recommendation after playback ends.
    ///
    /// Goes through the normal selection transition, so the refreshed
    /// recommendation fetch carries the same stale-response guard as an
    /// explicit pick.
    pub fn watch_next(&mut self) -> Option<RecommendationTicket> {
        let next = self.selection.recommendations.first().cloned()?;
        Some(self.select(next))
    }

    // -------------------------------------------------------------------------
    // Query editing (search box)
    // -------------------------------------------------------------------------

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        self.query.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = floor_char_boundary(&self.query, self.cursor - 1);
            self.query.remove(prev);
            self.cursor = prev;
        }
    }

    /// Clear query
    pub fn clear_query(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    /// Focus the search input
    pub fn focus_search(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    // -------------------------------------------------------------------------
    // Key handling
    // -------------------------------------------------------------------------

    /// Handle a key press, returning the side effect it requests
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        // Dismiss an error notice with any key before handling it
        if self.error.is_some() && key.code == KeyCode::Esc {
            self.clear_error();
            return Action::None;
        }

        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                match self.begin_search() {
                    Some(ticket) => Action::Search(ticket),
                    None => Action::None,
                }
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                Action::None
            }
            KeyCode::Backspace => {
                self.backspace();
                Action::None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear_query();
                Action::None
            }
            KeyCode::Char(c) => {
                self.insert(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                Action::None
            }
            KeyCode::Char('/') => {
                self.focus_search();
                Action::None
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Pane::Results => Pane::Recommendations,
                    Pane::Recommendations => Pane::Results,
                };
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focused_list_mut().up();
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.focused_list_mut().down();
                Action::None
            }
            KeyCode::Enter => match self.select_highlighted() {
                Some(ticket) => Action::FetchRecommendations(ticket),
                None => Action::None,
            },
            KeyCode::Char('o') => match self.selection.selected.clone() {
                Some(video) => Action::Play(video),
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    fn focused_list_mut(&mut self) -> &mut ListState {
        match self.focus {
            Pane::Results => &mut self.results_list,
            Pane::Recommendations => &mut self.rec_list,
        }
    }
}

/// Largest char boundary less than or equal to `index`
fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
