//! End-to-end flow tests
//!
//! Drives the orchestrator against a mocked backend: suggestion tabs,
//! debounced autosuggest, search, and the selection flow down to a bound
//! player.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use std::time::Duration;
use streamagg::app::{
    Action, App, InputMode, LoadingState, Pane, MSG_SOURCES_FAILED, MSG_SUBTITLES,
};
use streamagg::models::{Genre, MediaType};
use streamagg::player::{LocalPlayer, PlayerKind};
use streamagg::runtime::{Orchestrator, RuntimeOptions};
use streamagg::BackendClient;

const QUIET: Duration = Duration::from_millis(400);

fn orchestrator(server: &ServerGuard) -> Orchestrator {
    Orchestrator::new(
        App::new(),
        BackendClient::new(server.url()),
        LocalPlayer::new(PlayerKind::None),
        RuntimeOptions {
            debounce: Duration::from_millis(50),
            start_genre: Genre::Trending,
        },
    )
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

// =============================================================================
// Mock Response Fixtures
// =============================================================================

async fn mock_suggestions(server: &mut ServerGuard, genre: &str, title: &str) -> Mock {
    server
        .mock("GET", format!("/api/suggestions/{}", genre).as_str())
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "results": [
                    {"id": 1, "media_type": "movie", "title": title, "release_date": "2020-01-01", "vote_average": 6.5}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await
}

async fn mock_tv_detail(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/api/tv/1396")
        .with_status(200)
        .with_body(r#"{"id": 1396, "name": "Breaking Bad", "external_ids": {"imdb_id": "tt123"}}"#)
        .create_async()
        .await
}

async fn mock_seasons(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/api/tv/1396/seasons")
        .with_status(200)
        .with_body(
            r#"{"seasons": [
                {"season_number": -1, "episode_count": 0},
                {"season_number": 0, "episode_count": 2},
                {"season_number": 1, "episode_count": 7}
            ]}"#,
        )
        .create_async()
        .await
}

async fn mock_episodes(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/api/tv/1396/season/1/episodes")
        .with_status(200)
        .with_body(
            r#"{"episodes": [
                {"episode_number": 1, "name": "Pilot"},
                {"episode_number": 2, "name": "Cat's in the Bag..."},
                {"episode_number": 3, "name": "...And the Bag's in the River"}
            ]}"#,
        )
        .create_async()
        .await
}

fn two_sources() -> String {
    json!({
        "sources": [
            {"url": "https://embed.example/one", "name": "Alpha", "quality": "HD", "subtitles": true},
            {"url": "https://embed.example/two", "name": "Beta", "quality": "SD", "subtitles": false}
        ]
    })
    .to_string()
}

// =============================================================================
// Suggestion Feed
// =============================================================================

#[tokio::test]
async fn test_startup_loads_trending() {
    let mut server = Server::new_async().await;
    let mock = mock_suggestions(&mut server, "trending", "Oppenheimer").await;

    let mut orch = orchestrator(&server);
    orch.start().await;
    assert!(orch.app.feed.loading.is_loading());

    orch.settle(QUIET).await;
    mock.assert_async().await;
    assert_eq!(orch.app.feed.genre, Some(Genre::Trending));
    assert_eq!(orch.app.feed.loading, LoadingState::Idle);
    assert_eq!(orch.app.feed.items[0].title, "Oppenheimer");
}

#[tokio::test]
async fn test_last_selected_genre_wins() {
    let mut server = Server::new_async().await;
    let _action = mock_suggestions(&mut server, "action", "Heat").await;
    let _comedy = mock_suggestions(&mut server, "comedy", "Airplane!").await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::SelectGenre(Genre::Action)).await;
    orch.dispatch(Action::SelectGenre(Genre::Comedy)).await;
    orch.settle(QUIET).await;

    assert_eq!(orch.app.feed.genre, Some(Genre::Comedy));
    assert_eq!(orch.app.feed.items.len(), 1);
    assert_eq!(orch.app.feed.items[0].title, "Airplane!");
}

#[tokio::test]
async fn test_suggestion_failure_shows_error_state() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/suggestions/drama")
        .with_status(500)
        .with_body(r#"{"success": false, "error": "boom"}"#)
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::SelectGenre(Genre::Drama)).await;
    orch.settle(QUIET).await;

    assert!(orch.app.feed.loading.is_error());
    assert!(orch.app.feed.items.is_empty());
    assert!(orch.app.alert.is_none());
}

// =============================================================================
// Autosuggest / Search
// =============================================================================

#[tokio::test]
async fn test_short_query_issues_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::QueryChanged("d".into())).await;
    orch.dispatch(Action::QueryChanged(" d ".into())).await;
    orch.settle(QUIET).await;

    mock.assert_async().await;
    assert!(!orch.app.search.panel_visible);
}

#[tokio::test]
async fn test_typing_burst_sends_one_autosuggest_request() {
    let mut server = Server::new_async().await;
    let results: Vec<_> = (1..=8)
        .map(|i| json!({"id": i, "media_type": "movie", "title": format!("Dune {}", i)}))
        .collect();
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "dune".into()),
            Matcher::UrlEncoded("type".into(), "multi".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "results": results }).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    for text in ["du", "dun", "dune"] {
        orch.dispatch(Action::QueryChanged(text.into())).await;
    }
    orch.settle(QUIET).await;

    mock.assert_async().await;
    assert!(orch.app.search.panel_visible);
    assert_eq!(orch.app.search.suggestions.len(), 5);
}

#[tokio::test]
async fn test_selecting_a_suggestion_loads_content() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": [{"id": 1396, "media_type": "tv", "name": "Breaking Bad"}]}"#)
        .create_async()
        .await;
    let _detail = mock_tv_detail(&mut server).await;
    let _seasons = mock_seasons(&mut server).await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::FocusSearch).await;
    orch.dispatch(Action::QueryChanged("breaking".into())).await;
    orch.settle(QUIET).await;
    assert!(orch.app.search.panel_visible);

    // Down into the panel, Enter on the first row
    let down = orch.app.handle_key(key(KeyCode::Down));
    assert!(down.is_none());
    assert_eq!(orch.app.pane, Pane::Autosuggest);
    let action = orch.app.handle_key(key(KeyCode::Enter)).unwrap();
    assert_eq!(
        action,
        Action::SelectTitle {
            id: 1396,
            media_type: MediaType::Tv,
            title: "Breaking Bad".into()
        }
    );
    orch.dispatch(action).await;

    assert_eq!(orch.app.search.query, "Breaking Bad");
    assert!(!orch.app.search.panel_visible);
    assert!(!orch.app.feed.visible);
    assert!(orch.app.loading);

    orch.settle(QUIET).await;
    assert!(!orch.app.loading);
    assert!(orch.app.picker.visible);
    assert_eq!(orch.app.pane, Pane::Seasons);
}

#[tokio::test]
async fn test_submit_search_fills_results() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "heat".into()),
            Matcher::UrlEncoded("type".into(), "tv".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    orch.app.search.set_query("  heat ");
    orch.dispatch(Action::SetFilter(streamagg::SearchFilter::Tv)).await;
    orch.dispatch(Action::SubmitSearch).await;
    assert!(orch.app.loading);
    assert_eq!(orch.app.input_mode, InputMode::Normal);

    orch.settle(QUIET).await;
    mock.assert_async().await;
    assert!(!orch.app.loading);
    assert_eq!(orch.app.search.results.as_deref().map(<[_]>::len), Some(0));
}

// =============================================================================
// Selection Flow
// =============================================================================

#[tokio::test]
async fn test_tv_selection_sends_episode_request_and_binds_first_source() {
    let mut server = Server::new_async().await;
    let _detail = mock_tv_detail(&mut server).await;
    let _seasons = mock_seasons(&mut server).await;
    let _episodes = mock_episodes(&mut server).await;
    let stream = server
        .mock("POST", "/api/stream")
        .match_body(Matcher::Json(json!({
            "imdb_id": "tt123",
            "media_type": "tv",
            "season": "1",
            "episode": "3"
        })))
        .with_status(200)
        .with_body(two_sources())
        .expect(1)
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::OpenResult {
        id: 1396,
        media_type: MediaType::Tv,
        title: "Breaking Bad".into(),
    })
    .await;
    orch.settle(QUIET).await;

    // Negative season numbers are not offered
    let numbers: Vec<i32> = orch
        .app
        .picker
        .seasons
        .iter()
        .map(|s| s.season_number)
        .collect();
    assert_eq!(numbers, vec![0, 1]);

    orch.dispatch(Action::SelectSeason(1)).await;
    orch.settle(QUIET).await;
    assert_eq!(orch.app.picker.episodes.len(), 3);

    orch.dispatch(Action::SelectEpisode(3)).await;
    orch.settle(QUIET).await;

    stream.assert_async().await;
    let selection = orch.app.selection.as_ref().unwrap();
    assert_eq!(selection.external_id.as_deref(), Some("tt123"));
    assert_eq!(orch.app.sources.sources.len(), 2);
    assert_eq!(orch.app.player.url.as_deref(), Some("https://embed.example/one"));
    assert_eq!(orch.app.player.label.as_deref(), Some("Now Playing - Alpha"));
    assert!(orch.app.player.is_active(0));
    assert!(!orch.app.player.is_active(1));
}

#[tokio::test]
async fn test_movie_selection_goes_straight_to_sources() {
    let mut server = Server::new_async().await;
    let _detail = server
        .mock("GET", "/api/movie/27205")
        .with_status(200)
        .with_body(r#"{"id": 27205, "title": "Inception", "external_ids": {"imdb_id": "tt999"}}"#)
        .create_async()
        .await;
    let seasons = server
        .mock("GET", Matcher::Regex(r"^/api/tv/.*".into()))
        .expect(0)
        .create_async()
        .await;
    let stream = server
        .mock("POST", "/api/stream")
        .match_body(Matcher::Json(json!({"imdb_id": "tt999", "media_type": "movie"})))
        .with_status(200)
        .with_body(two_sources())
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::SelectTitle {
        id: 27205,
        media_type: MediaType::Movie,
        title: "Inception".into(),
    })
    .await;
    orch.settle(QUIET).await;

    stream.assert_async().await;
    seasons.assert_async().await;
    assert!(!orch.app.picker.visible);
    assert!(orch.app.player.visible);
    assert_eq!(orch.app.pane, Pane::Sources);

    // Switching sources moves the active marker
    orch.dispatch(Action::PlaySource(1)).await;
    assert!(orch.app.player.is_active(1));
    assert_eq!(orch.app.player.label.as_deref(), Some("Now Playing - Beta"));
}

#[tokio::test]
async fn test_missing_imdb_id_stops_before_stream_request() {
    let mut server = Server::new_async().await;
    let _detail = server
        .mock("GET", "/api/movie/5")
        .with_status(200)
        .with_body(r#"{"id": 5, "title": "Four Rooms", "external_ids": {}}"#)
        .create_async()
        .await;
    let stream = server
        .mock("POST", "/api/stream")
        .expect(0)
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::OpenResult {
        id: 5,
        media_type: MediaType::Movie,
        title: "Four Rooms".into(),
    })
    .await;
    orch.settle(QUIET).await;

    stream.assert_async().await;
    assert_eq!(
        orch.app.alert.as_deref(),
        Some("IMDb ID not found for this movie.")
    );
    assert!(!orch.app.loading);
    assert!(!orch.app.player.visible);
}

#[tokio::test]
async fn test_empty_source_list_leaves_player_unbound() {
    let mut server = Server::new_async().await;
    let _detail = server
        .mock("GET", "/api/movie/8")
        .with_status(200)
        .with_body(r#"{"id": 8, "title": "Obscure", "external_ids": {"imdb_id": "tt0000008"}}"#)
        .create_async()
        .await;
    let _stream = server
        .mock("POST", "/api/stream")
        .with_status(200)
        .with_body(r#"{"sources": []}"#)
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::OpenResult {
        id: 8,
        media_type: MediaType::Movie,
        title: "Obscure".into(),
    })
    .await;
    orch.settle(QUIET).await;

    assert!(orch.app.sources.visible);
    assert!(orch.app.sources.sources.is_empty());
    assert!(!orch.app.player.visible);
    assert!(orch.app.player.url.is_none());
    assert!(orch.app.alert.is_none());
}

#[tokio::test]
async fn test_source_failure_raises_alert() {
    let mut server = Server::new_async().await;
    let _detail = server
        .mock("GET", "/api/movie/9")
        .with_status(200)
        .with_body(r#"{"id": 9, "title": "Nine", "external_ids": {"imdb_id": "tt0000009"}}"#)
        .create_async()
        .await;
    let _stream = server
        .mock("POST", "/api/stream")
        .with_status(502)
        .with_body(r#"{"error": "provider down"}"#)
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::OpenResult {
        id: 9,
        media_type: MediaType::Movie,
        title: "Nine".into(),
    })
    .await;
    orch.settle(QUIET).await;

    assert_eq!(orch.app.alert.as_deref(), Some(MSG_SOURCES_FAILED));
    assert!(!orch.app.loading);

    // Alert swallows keys until dismissed
    assert!(orch.app.handle_key(key(KeyCode::Char('q'))).is_none());
    let dismiss = orch.app.handle_key(key(KeyCode::Enter)).unwrap();
    orch.dispatch(dismiss).await;
    assert!(orch.app.alert.is_none());
}

#[tokio::test]
async fn test_replaced_selection_ignores_late_detail() {
    let mut server = Server::new_async().await;
    let _first = mock_tv_detail(&mut server).await;
    let _seasons = mock_seasons(&mut server).await;
    let _second = server
        .mock("GET", "/api/movie/27205")
        .with_status(200)
        .with_body(r#"{"id": 27205, "title": "Inception", "external_ids": {"imdb_id": "tt999"}}"#)
        .create_async()
        .await;
    let _stream = server
        .mock("POST", "/api/stream")
        .with_status(200)
        .with_body(two_sources())
        .create_async()
        .await;

    let mut orch = orchestrator(&server);
    orch.dispatch(Action::OpenResult {
        id: 1396,
        media_type: MediaType::Tv,
        title: "Breaking Bad".into(),
    })
    .await;
    orch.dispatch(Action::OpenResult {
        id: 27205,
        media_type: MediaType::Movie,
        title: "Inception".into(),
    })
    .await;
    orch.settle(QUIET).await;

    let selection = orch.app.selection.as_ref().unwrap();
    assert_eq!(selection.id, 27205);
    assert!(!orch.app.picker.visible);
    assert!(orch.app.player.visible);
}

// =============================================================================
// Playback Controls
// =============================================================================

#[tokio::test]
async fn test_fullscreen_without_capable_player_is_noop() {
    let server = Server::new_async().await;
    let mut orch = orchestrator(&server);

    orch.dispatch(Action::ToggleFullscreen).await;
    assert!(!orch.app.player.fullscreen);
    assert!(orch.app.notice.is_none());
}

#[tokio::test]
async fn test_subtitle_toggle_sets_notice_only() {
    let server = Server::new_async().await;
    let mut orch = orchestrator(&server);

    orch.dispatch(Action::ToggleSubtitles).await;
    assert_eq!(orch.app.notice.as_deref(), Some(MSG_SUBTITLES));
    assert!(orch.app.alert.is_none());
    assert!(!orch.app.player.visible);
}
