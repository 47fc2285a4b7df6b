//! Integration tests for the selection controller
//!
//! Exercises the search -> auto-select -> recommendation pipeline and
//! the guards that keep late responses from corrupting newer state.

use tubetui::app::RECOMMENDATION_CAP;
use tubetui::{ApiError, App, VideoSummary, YouTubeError};

fn video(id: &str, channel: &str) -> VideoSummary {
    VideoSummary {
        id: id.to_string(),
        title: format!("Video {}", id),
        description: String::new(),
        channel_id: channel.to_string(),
        channel_title: "Channel".to_string(),
        thumbnail_url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
    }
}

fn search_err(query: &str) -> YouTubeError {
    YouTubeError::SearchFailed {
        query: query.to_string(),
        source: ApiError::Status(500),
    }
}

fn channel_err(channel_id: &str) -> YouTubeError {
    YouTubeError::ChannelLookupFailed {
        channel_id: channel_id.to_string(),
        source: ApiError::Status(500),
    }
}

#[test]
fn successful_search_auto_selects_first_result() {
    let mut app = App::new();
    app.query = "rust".to_string();
    let ticket = app.begin_search().unwrap();

    let rec_ticket = app
        .apply_search(ticket.epoch, Ok(vec![video("a", "UC1"), video("b", "UC2")]))
        .expect("auto-select should request recommendations");

    assert_eq!(app.selection.results.len(), 2);
    assert_eq!(app.selection.selected.as_ref().unwrap().id, "a");
    assert_eq!(rec_ticket.video_id, "a");
    assert_eq!(rec_ticket.channel_id, "UC1");
    assert!(!app.loading.is_loading());
    assert!(app.error.is_none());
}

#[test]
fn empty_search_leaves_nothing_selected() {
    let mut app = App::new();
    app.query = "rust".to_string();
    let ticket = app.begin_search().unwrap();

    let rec_ticket = app.apply_search(ticket.epoch, Ok(vec![]));

    assert!(rec_ticket.is_none());
    assert!(app.selection.results.is_empty());
    assert!(app.selection.selected.is_none());
    assert!(app.selection.recommendations.is_empty());
}

#[test]
fn recommendations_exclude_selected_and_cap_at_four() {
    let mut app = App::new();
    app.query = "rust".to_string();
    let ticket = app.begin_search().unwrap();
    app.apply_search(ticket.epoch, Ok(vec![video("A", "UC1")]));

    // Channel fetch returns six videos including the selected one
    app.apply_recommendations(
        "A",
        Ok(vec![
            video("B", "UC1"),
            video("A", "UC1"),
            video("C", "UC1"),
            video("D", "UC1"),
            video("E", "UC1"),
            video("F", "UC1"),
        ]),
    );

    let ids: Vec<&str> = app
        .selection
        .recommendations
        .iter()
        .map(|v| v.id.as_str())
        .collect();
    assert_eq!(ids, ["B", "C", "D", "E"]);
    assert_eq!(app.selection.recommendations.len(), RECOMMENDATION_CAP);
}

#[test]
fn stale_search_response_is_discarded() {
    let mut app = App::new();
    app.query = "first".to_string();
    let old = app.begin_search().unwrap();
    app.query = "second".to_string();
    let new = app.begin_search().unwrap();

    // Old response arrives after the newer request was issued
    assert!(app
        .apply_search(old.epoch, Ok(vec![video("stale", "UC1")]))
        .is_none());
    assert!(app.selection.results.is_empty());

    // The current response still lands normally
    app.apply_search(new.epoch, Ok(vec![video("fresh", "UC2")]));
    assert_eq!(app.selection.results[0].id, "fresh");
}

#[test]
fn stale_recommendation_response_is_discarded() {
    let mut app = App::new();
    app.query = "rust".to_string();
    let ticket = app.begin_search().unwrap();
    app.apply_search(
        ticket.epoch,
        Ok(vec![video("X", "UC1"), video("Y", "UC2")]),
    );

    // User picks Y before X's channel fetch completes
    app.results_list.down();
    app.select_highlighted().unwrap();

    // X's late response must not overwrite Y's recommendations
    app.apply_recommendations("X", Ok(vec![video("x-rec", "UC1")]));
    assert!(app.selection.recommendations.is_empty());

    app.apply_recommendations("Y", Ok(vec![video("y-rec", "UC2")]));
    assert_eq!(app.selection.recommendations[0].id, "y-rec");
}

#[test]
fn failed_search_keeps_prior_state_and_surfaces_one_notice() {
    let mut app = App::new();
    app.query = "good".to_string();
    let ok_ticket = app.begin_search().unwrap();
    app.apply_search(ok_ticket.epoch, Ok(vec![video("a", "UC1")]));

    app.query = "bad".to_string();
    let bad_ticket = app.begin_search().unwrap();
    app.apply_search(bad_ticket.epoch, Err(search_err("bad")));

    // Prior results and selection survive the failure
    assert_eq!(app.selection.results.len(), 1);
    assert_eq!(app.selection.selected.as_ref().unwrap().id, "a");
    assert!(!app.loading.is_loading());

    // Exactly one generic notice, no quota or transport details
    let notice = app.error.as_deref().unwrap();
    assert!(!notice.contains("500"));
    assert!(!notice.contains("quota"));
}

#[test]
fn failed_channel_fetch_degrades_to_empty_without_notice() {
    let mut app = App::new();
    app.query = "rust".to_string();
    let ticket = app.begin_search().unwrap();
    app.apply_search(ticket.epoch, Ok(vec![video("a", "UC1")]));

    app.apply_recommendations("a", Err(channel_err("UC1")));

    assert!(app.selection.recommendations.is_empty());
    assert_eq!(app.selection.selected.as_ref().unwrap().id, "a");
    assert!(app.error.is_none());
}

#[test]
fn reselecting_same_video_reissues_fetch() {
    let mut app = App::new();
    app.query = "rust".to_string();
    let ticket = app.begin_search().unwrap();
    let first = app
        .apply_search(ticket.epoch, Ok(vec![video("a", "UC1")]))
        .unwrap();

    let second = app.select_highlighted().unwrap();
    assert_eq!(first, second);
}

#[test]
fn watch_next_advances_to_first_recommendation() {
    let mut app = App::new();
    app.query = "rust".to_string();
    let ticket = app.begin_search().unwrap();
    app.apply_search(ticket.epoch, Ok(vec![video("a", "UC1")]));
    app.apply_recommendations("a", Ok(vec![video("b", "UC1"), video("c", "UC1")]));

    let next = app.watch_next().expect("recommendation available");
    assert_eq!(next.video_id, "b");
    assert_eq!(app.selection.selected.as_ref().unwrap().id, "b");

    // The old selection's late channel response is now stale
    app.apply_recommendations("a", Ok(vec![video("z", "UC1")]));
    assert_ne!(
        app.selection
            .recommendations
            .first()
            .map(|v| v.id.as_str()),
        Some("z")
    );
}

#[test]
fn watch_next_without_recommendations_is_noop() {
    let mut app = App::new();
    app.query = "rust".to_string();
    let ticket = app.begin_search().unwrap();
    app.apply_search(ticket.epoch, Ok(vec![video("a", "UC1")]));

    assert!(app.watch_next().is_none());
    assert_eq!(app.selection.selected.as_ref().unwrap().id, "a");
}
