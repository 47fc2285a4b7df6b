//! YouTube Data API v3 client
//!
//! Wraps the `search` endpoint: free-text search and per-channel listings,
//! both restricted to embeddable videos. Responses are normalized into
//! [`VideoSummary`] values; upstream items that carry no usable video id
//! or channel id are dropped from the batch rather than failing the call.
//! API docs: https://developers.google.com/youtube/v3/docs/search/list

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::VideoSummary;

/// Lookup failures, tagged with the request that triggered them.
///
/// The user-visible message stays generic; the transport-level cause is
/// attached as the error source and is only ever logged.
#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("search for \"{query}\" failed")]
    SearchFailed {
        query: String,
        #[source]
        source: ApiError,
    },

    #[error("channel lookup for \"{channel_id}\" failed")]
    ChannelLookupFailed {
        channel_id: String,
        #[source]
        source: ApiError,
    },
}

impl YouTubeError {
    /// The underlying transport or decoding failure
    pub fn cause(&self) -> &ApiError {
        match self {
            YouTubeError::SearchFailed { source, .. } => source,
            YouTubeError::ChannelLookupFailed { source, .. } => source,
        }
    }
}

/// Transport-level failure behind a [`YouTubeError`]
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// YouTube search API client
pub struct YouTubeClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl YouTubeClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://www.googleapis.com/youtube/v3")
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Search for videos by free-text query.
    ///
    /// Callers trim the query before calling; `limit` caps the number of
    /// items requested upstream (the result may be shorter, or empty).
    /// Order of the returned summaries matches upstream relevance order.
    pub async fn search_videos(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<VideoSummary>, YouTubeError> {
        let params = format!("q={}&maxResults={}", urlencoding::encode(query), limit);
        self.fetch(&params)
            .await
            .map_err(|source| YouTubeError::SearchFailed {
                query: query.to_string(),
                source,
            })
    }

    /// List a channel's videos, newest first.
    ///
    /// Used to build the recommendation set for a playing video.
    pub async fn channel_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<VideoSummary>, YouTubeError> {
        let params = format!(
            "channelId={}&order=date&maxResults={}",
            urlencoding::encode(channel_id),
            limit
        );
        self.fetch(&params)
            .await
            .map_err(|source| YouTubeError::ChannelLookupFailed {
                channel_id: channel_id.to_string(),
                source,
            })
    }

    /// Issue one search request with the shared parameter set and
    /// normalize the response items
    async fn fetch(&self, params: &str) -> Result<Vec<VideoSummary>, ApiError> {
        let url = format!(
            "{}/search?key={}&part=snippet&type=video&videoEmbeddable=true&{}",
            self.base_url, self.api_key, params
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        parsed.into_summaries()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

impl SearchResponse {
    fn into_summaries(self) -> Result<Vec<VideoSummary>, ApiError> {
        let mut summaries = Vec::with_capacity(self.items.len());
        for item in self.items {
            if let Some(summary) = item.into_summary()? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<ItemId>,
    snippet: Option<Snippet>,
}

/// The `id` field arrives either as a bare video-id string or as an
/// object wrapping the id alongside a resource kind
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemId {
    Bare(String),
    Nested {
        #[serde(rename = "videoId")]
        video_id: Option<String>,
    },
}

impl SearchItem {
    /// Normalize one upstream item.
    ///
    /// Returns `Ok(None)` for items that cannot identify a video or a
    /// channel (dropped, the batch still succeeds). An item with a
    /// thumbnails object offering no variant at all is a malformed
    /// response and fails the whole call.
    fn into_summary(self) -> Result<Option<VideoSummary>, ApiError> {
        let video_id = match self.id {
            Some(ItemId::Bare(id)) if !id.is_empty() => id,
            Some(ItemId::Nested { video_id: Some(id) }) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let Some(snippet) = self.snippet else {
            return Ok(None);
        };
        if snippet.channel_id.is_empty() {
            return Ok(None);
        }

        let thumbnail_url = snippet.thumbnails.preferred_url().ok_or_else(|| {
            ApiError::InvalidResponse(format!("item {} has no thumbnail variant", video_id))
        })?;

        Ok(Some(VideoSummary {
            id: video_id,
            title: snippet.title,
            description: snippet.description,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            thumbnail_url,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "channelId", default)]
    channel_id: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Pick the "high" variant, falling back through the lower
    /// resolutions when it is missing
    fn preferred_url(self) -> Option<String> {
        self.high
            .or(self.medium)
            .or(self.default)
            .map(|t| t.url)
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumb(url: &str) -> Option<Thumbnail> {
        Some(Thumbnail {
            url: url.to_string(),
        })
    }

    fn snippet() -> Snippet {
        Snippet {
            title: "Title".to_string(),
            description: "Desc".to_string(),
            channel_id: "UC1".to_string(),
            channel_title: "Channel".to_string(),
            thumbnails: Thumbnails {
                high: thumb("https://example.com/high.jpg"),
                medium: thumb("https://example.com/medium.jpg"),
                default: thumb("https://example.com/default.jpg"),
            },
        }
    }

    #[test]
    fn test_bare_id_passes_through() {
        let item = SearchItem {
            id: Some(ItemId::Bare("abc123".to_string())),
            snippet: Some(snippet()),
        };
        let summary = item.into_summary().unwrap().unwrap();
        assert_eq!(summary.id, "abc123");
    }

    #[test]
    fn test_nested_id_is_extracted() {
        let item = SearchItem {
            id: Some(ItemId::Nested {
                video_id: Some("xyz789".to_string()),
            }),
            snippet: Some(snippet()),
        };
        let summary = item.into_summary().unwrap().unwrap();
        assert_eq!(summary.id, "xyz789");
    }

    #[test]
    fn test_item_without_video_id_is_dropped() {
        let item = SearchItem {
            id: Some(ItemId::Nested { video_id: None }),
            snippet: Some(snippet()),
        };
        assert!(item.into_summary().unwrap().is_none());

        let item = SearchItem {
            id: None,
            snippet: Some(snippet()),
        };
        assert!(item.into_summary().unwrap().is_none());
    }

    #[test]
    fn test_item_without_channel_id_is_dropped() {
        let mut s = snippet();
        s.channel_id = String::new();
        let item = SearchItem {
            id: Some(ItemId::Bare("abc".to_string())),
            snippet: Some(s),
        };
        assert!(item.into_summary().unwrap().is_none());
    }

    #[test]
    fn test_thumbnail_falls_back_to_lower_resolutions() {
        let mut s = snippet();
        s.thumbnails.high = None;
        let item = SearchItem {
            id: Some(ItemId::Bare("abc".to_string())),
            snippet: Some(s),
        };
        let summary = item.into_summary().unwrap().unwrap();
        assert_eq!(summary.thumbnail_url, "https://example.com/medium.jpg");

        let mut s = snippet();
        s.thumbnails.high = None;
        s.thumbnails.medium = None;
        let item = SearchItem {
            id: Some(ItemId::Bare("abc".to_string())),
            snippet: Some(s),
        };
        let summary = item.into_summary().unwrap().unwrap();
        assert_eq!(summary.thumbnail_url, "https://example.com/default.jpg");
    }

    #[test]
    fn test_no_thumbnail_variant_is_invalid_response() {
        let mut s = snippet();
        s.thumbnails = Thumbnails::default();
        let item = SearchItem {
            id: Some(ItemId::Bare("abc".to_string())),
            snippet: Some(s),
        };
        assert!(matches!(
            item.into_summary(),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_id_deserializes_from_both_shapes() {
        let bare: ItemId = serde_json::from_str(r#""abc123""#).unwrap();
        assert!(matches!(bare, ItemId::Bare(id) if id == "abc123"));

        let nested: ItemId =
            serde_json::from_str(r#"{"kind": "youtube#video", "videoId": "xyz"}"#).unwrap();
        assert!(matches!(nested, ItemId::Nested { video_id: Some(id) } if id == "xyz"));
    }
}
