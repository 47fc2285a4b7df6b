//! API clients for external services
//!
//! - `youtube` - YouTube Data API v3 search client

pub mod youtube;

pub use youtube::{ApiError, YouTubeClient, YouTubeError};
