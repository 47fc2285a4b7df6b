//! External playback - mpv and browser handoff
//!
//! There is no embedded player; a selected video is opened either in mpv
//! (which resolves YouTube URLs itself) or in the system browser. An mpv
//! launch hands back the child process so the caller can observe the end
//! of playback; a browser launch is fire-and-forget.

use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, Command};

/// URL to watch a video in a browser or external player
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Embeddable URL variant for the same video
pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

/// Supported playback targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerKind {
    /// mpv media player (default)
    #[default]
    Mpv,
    /// System default browser
    Browser,
}

impl PlayerKind {
    /// Parse a config value; unknown values fall back to the default
    pub fn from_config(value: Option<&str>) -> Self {
        match value {
            Some("browser") => PlayerKind::Browser,
            _ => PlayerKind::Mpv,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerKind::Mpv => "mpv",
            PlayerKind::Browser => "browser",
        }
    }
}

impl std::fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Errors from playback handoff
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("mpv not found. Install it first.")]
    MpvNotFound,
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
}

/// Launcher for external playback
pub struct Player {
    kind: PlayerKind,
}

impl Player {
    pub fn new(kind: PlayerKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    /// Check if mpv is available on the system
    pub async fn mpv_available() -> bool {
        Command::new("which")
            .arg("mpv")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Open a video.
    ///
    /// Returns the mpv child process when one was spawned; waiting on it
    /// is how playback-ended is detected. Browser playback returns
    /// `None` since there is nothing to wait for.
    pub async fn play(&self, video_id: &str) -> Result<Option<Child>, PlayerError> {
        let url = watch_url(video_id);
        match self.kind {
            PlayerKind::Mpv => {
                if !Self::mpv_available().await {
                    return Err(PlayerError::MpvNotFound);
                }
                let child = Command::new("mpv")
                    .arg("--no-terminal")
                    .arg(&url)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()?;
                Ok(Some(child))
            }
            PlayerKind::Browser => {
                open_in_browser(&url)?;
                Ok(None)
            }
        }
    }
}

/// Spawn the platform's URL opener, detached
fn open_in_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(target_os = "macos"))]
    let opener = "xdg-open";

    Command::new(opener)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            embed_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_player_kind_from_config() {
        assert_eq!(PlayerKind::from_config(Some("browser")), PlayerKind::Browser);
        assert_eq!(PlayerKind::from_config(Some("mpv")), PlayerKind::Mpv);
        assert_eq!(PlayerKind::from_config(Some("vlc")), PlayerKind::Mpv);
        assert_eq!(PlayerKind::from_config(None), PlayerKind::Mpv);
    }

    #[test]
    fn test_player_kind_display() {
        assert_eq!(PlayerKind::Mpv.to_string(), "mpv");
        assert_eq!(PlayerKind::Browser.to_string(), "browser");
    }
}
