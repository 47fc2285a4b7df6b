//! CLI - Command Line Interface for TubeTUI
//!
//! Every TUI action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search for videos
//! tubetui search "rust async" --json
//!
//! # Latest uploads for a channel
//! tubetui channel UC_x5XG1OV2P6uZZ5FSM9Ttw --limit 6
//!
//! # Recommendations for a playing video
//! tubetui related dQw4w9WgXcQ --channel UCuAXFkgsw1L7xaCfnd5JJOw
//!
//! # Print the watch URL
//! tubetui url dQw4w9WgXcQ
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Missing configuration (no API key)
    ConfigMissing = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// TubeTUI - terminal client for searching and playing YouTube videos
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "tubetui",
    version,
    author = "Gorka & Hermes",
    about = "Terminal client for searching and playing YouTube videos",
    long_about = "Search YouTube, pick a result, and play it in mpv or the \
                  browser, with same-channel recommendations alongside.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  tubetui                                 Launch interactive TUI\n\
                  tubetui search \"rust async\"             Search for videos\n\
                  tubetui channel UC_x5XG1OV2P6uZZ5FSM9Ttw Latest channel uploads\n\
                  tubetui url dQw4w9WgXcQ --embed         Print the embed URL"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for videos
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// List a channel's videos, newest first
    #[command(visible_alias = "ch")]
    Channel(ChannelCmd),

    /// Recommendations for a video from its own channel
    #[command(visible_alias = "rel")]
    Related(RelatedCmd),

    /// Print the watch (or embed) URL for a video
    Url(UrlCmd),

    /// Open a video in mpv or the browser
    #[command(visible_alias = "p")]
    Play(PlayCmd),
}

/// Search for videos by free-text query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "5")]
    pub limit: u32,
}

/// List the latest uploads for a channel
#[derive(Args, Debug)]
pub struct ChannelCmd {
    /// Channel identifier (e.g., UC_x5XG1OV2P6uZZ5FSM9Ttw)
    #[arg(required = true)]
    pub channel_id: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "6")]
    pub limit: u32,
}

/// Derive the recommendation list for a playing video
#[derive(Args, Debug)]
pub struct RelatedCmd {
    /// Video identifier of the playing video
    #[arg(required = true)]
    pub video_id: String,

    /// Channel the video belongs to
    #[arg(long, short = 'c', required = true)]
    pub channel: String,
}

/// Print the URL for a video
#[derive(Args, Debug)]
pub struct UrlCmd {
    /// Video identifier
    #[arg(required = true)]
    pub video_id: String,

    /// Print the embed URL instead of the watch URL
    #[arg(long)]
    pub embed: bool,
}

/// Open a video in an external player
#[derive(Args, Debug)]
pub struct PlayCmd {
    /// Video identifier
    #[arg(required = true)]
    pub video_id: String,

    /// Player to use
    #[arg(long, short = 'p', value_enum, default_value = "mpv")]
    pub player: PlayerChoice,
}

/// External player selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerChoice {
    /// mpv media player (default)
    #[default]
    Mpv,
    /// System default browser
    Browser,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from::<_, &str>(["tubetui"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["tubetui", "search", "rust async"]);
        assert!(cli.is_cli_mode());
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.query, "rust async");
            assert_eq!(cmd.limit, 5); // default
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_channel_command_with_limit() {
        let cli = Cli::parse_from(["tubetui", "channel", "UC123", "-l", "3"]);
        if let Some(Command::Channel(cmd)) = cli.command {
            assert_eq!(cmd.channel_id, "UC123");
            assert_eq!(cmd.limit, 3);
        } else {
            panic!("Expected Channel command");
        }
    }

    #[test]
    fn test_related_requires_channel() {
        let result = Cli::try_parse_from(["tubetui", "related", "abc"]);
        assert!(result.is_err());

        let cli = Cli::parse_from(["tubetui", "related", "abc", "--channel", "UC123"]);
        if let Some(Command::Related(cmd)) = cli.command {
            assert_eq!(cmd.video_id, "abc");
            assert_eq!(cmd.channel, "UC123");
        } else {
            panic!("Expected Related command");
        }
    }

    #[test]
    fn test_url_command_embed_flag() {
        let cli = Cli::parse_from(["tubetui", "url", "abc", "--embed"]);
        if let Some(Command::Url(cmd)) = cli.command {
            assert_eq!(cmd.video_id, "abc");
            assert!(cmd.embed);
        } else {
            panic!("Expected Url command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["tubetui", "--json", "--quiet", "search", "test"]);
        assert!(cli.json);
        assert!(cli.quiet);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::ConfigMissing), 4);
    }
}
