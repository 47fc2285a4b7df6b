//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the appropriate backend
//! services. Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;

use crate::api::YouTubeClient;
use crate::app::{CHANNEL_FETCH_LIMIT, RECOMMENDATION_CAP};
use crate::cli::{ChannelCmd, ExitCode, Output, PlayCmd, PlayerChoice, RelatedCmd, SearchCmd, UrlCmd};
use crate::config::Config;
use crate::player::{embed_url, watch_url, Player, PlayerKind};

/// Resolve the API key or report the configuration error
fn client_or_exit(output: &Output) -> Result<YouTubeClient, ExitCode> {
    let config = Config::load();
    match config.require_api_key() {
        Ok(key) => Ok(YouTubeClient::new(key)),
        Err(e) => Err(output.error(e.to_string(), ExitCode::ConfigMissing)),
    }
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query must not be empty", ExitCode::InvalidArgs);
    }
    if cmd.limit == 0 {
        return output.error("Limit must be at least 1", ExitCode::InvalidArgs);
    }

    let client = match client_or_exit(output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    output.info(format!("Searching for: {}", query));

    match client.search_videos(query, cmd.limit).await {
        Ok(results) => {
            if let Err(e) = output.print(&results) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            tracing::error!(cause = %e.cause(), "{}", e);
            output.error(format!("{}", e), ExitCode::NetworkError)
        }
    }
}

// =============================================================================
// Channel Command
// =============================================================================

pub async fn channel_cmd(cmd: ChannelCmd, output: &Output) -> ExitCode {
    if cmd.limit == 0 {
        return output.error("Limit must be at least 1", ExitCode::InvalidArgs);
    }

    let client = match client_or_exit(output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    output.info(format!("Fetching uploads for channel: {}", cmd.channel_id));

    match client.channel_videos(&cmd.channel_id, cmd.limit).await {
        Ok(results) => {
            if let Err(e) = output.print(&results) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            tracing::error!(cause = %e.cause(), "{}", e);
            output.error(format!("{}", e), ExitCode::NetworkError)
        }
    }
}

// =============================================================================
// Related Command
// =============================================================================

pub async fn related_cmd(cmd: RelatedCmd, output: &Output) -> ExitCode {
    let client = match client_or_exit(output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    output.info(format!("Fetching recommendations for: {}", cmd.video_id));

    match client
        .channel_videos(&cmd.channel, CHANNEL_FETCH_LIMIT)
        .await
    {
        Ok(videos) => {
            // Same derivation the TUI uses: never recommend the video
            // itself, keep at most the first four remaining entries
            let related: Vec<_> = videos
                .into_iter()
                .filter(|v| v.id != cmd.video_id)
                .take(RECOMMENDATION_CAP)
                .collect();
            if let Err(e) = output.print(&related) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            tracing::error!(cause = %e.cause(), "{}", e);
            output.error(format!("{}", e), ExitCode::NetworkError)
        }
    }
}

// =============================================================================
// Url Command
// =============================================================================

/// URL response payload
#[derive(Debug, Serialize)]
struct UrlResponse {
    video_id: String,
    url: String,
}

pub async fn url_cmd(cmd: UrlCmd, output: &Output) -> ExitCode {
    let url = if cmd.embed {
        embed_url(&cmd.video_id)
    } else {
        watch_url(&cmd.video_id)
    };

    if output.json {
        let response = UrlResponse {
            video_id: cmd.video_id,
            url,
        };
        if let Err(e) = output.print(&response) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        println!("{}", url);
    }
    ExitCode::Success
}

// =============================================================================
// Play Command
// =============================================================================

pub async fn play_cmd(cmd: PlayCmd, output: &Output) -> ExitCode {
    let kind = match cmd.player {
        PlayerChoice::Mpv => PlayerKind::Mpv,
        PlayerChoice::Browser => PlayerKind::Browser,
    };
    let player = Player::new(kind);

    output.info(format!("Opening {} in {}", cmd.video_id, kind));

    match player.play(&cmd.video_id).await {
        Ok(Some(mut child)) => {
            // Foreground playback: wait so the exit code reflects mpv
            match child.wait().await {
                Ok(status) if status.success() => ExitCode::Success,
                Ok(status) => output.error(
                    format!("Player exited with status {}", status),
                    ExitCode::Error,
                ),
                Err(e) => output.error(format!("Failed to wait on player: {}", e), ExitCode::Error),
            }
        }
        Ok(None) => ExitCode::Success,
        Err(e) => output.error(format!("{}", e), ExitCode::Error),
    }
}
