//! Data structures and types for TubeTUI
//!
//! Everything downstream of the API client operates on the normalized
//! [`VideoSummary`]; the raw YouTube response shapes never leave `api`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized representation of one searchable video result.
///
/// `id` and `channel_id` are always populated: the API client drops any
/// upstream item that lacks either instead of producing a partial summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSummary {
    /// Opaque platform video identifier
    pub id: String,
    /// Video title (may be empty)
    pub title: String,
    /// Video description (may be empty)
    pub description: String,
    /// Opaque platform channel identifier
    pub channel_id: String,
    /// Human-readable channel name
    pub channel_title: String,
    /// Absolute URL of the preferred thumbnail variant
    pub thumbnail_url: String,
}

impl VideoSummary {
    /// URL to watch this video in a browser or external player
    pub fn watch_url(&self) -> String {
        crate::player::watch_url(&self.id)
    }
}

impl fmt::Display for VideoSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.title, self.channel_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> VideoSummary {
        VideoSummary {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Test Video".to_string(),
            description: "A video".to_string(),
            channel_id: "UC123".to_string(),
            channel_title: "Test Channel".to_string(),
            thumbnail_url: "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string(),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(summary().to_string(), "Test Video — Test Channel");
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            summary().watch_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&summary()).unwrap();
        let parsed: VideoSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary());
    }
}
