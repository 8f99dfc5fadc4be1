//! UI rendering tests
//!
//! Renders the full screen into a TestBackend and checks what each region
//! shows for a given app state.

use ratatui::{backend::TestBackend, Terminal};
use streamagg::app::{
    App, InputMode, LoadingState, Pane, MSG_NO_RESULTS, MSG_NO_SUGGESTIONS, MSG_SUBTITLES,
    MSG_SUGGESTIONS_FAILED,
};
use streamagg::models::{Episode, Genre, MediaType, SeasonSummary, Selection, Source, TitleItem};
use streamagg::ui;

/// Helper to create a test terminal with given size
fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).unwrap()
}

/// Render `app` and return the screen as one string per row
fn render(app: &App, width: u16, height: u16) -> Vec<String> {
    let mut terminal = test_terminal(width, height);
    terminal.draw(|frame| ui::render(frame, app)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

fn screen_contains(screen: &[String], needle: &str) -> bool {
    screen.iter().any(|row| row.contains(needle))
}

fn item(id: u64, media_type: MediaType, title: &str, date: &str) -> TitleItem {
    TitleItem {
        id,
        media_type,
        title: title.to_string(),
        date: Some(date.to_string()),
        vote_average: Some(7.9),
        poster_path: None,
    }
}

fn source(name: &str, quality: &str, subtitles: bool) -> Source {
    Source {
        url: format!("https://embed.example/{}", name.to_lowercase()),
        name: name.to_string(),
        quality: quality.to_string(),
        has_subtitles: subtitles,
    }
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_renders_at_minimum_and_large_sizes() {
    let app = App::new();
    for (w, h) in [(80, 24), (200, 50)] {
        let screen = render(&app, w, h);
        assert_eq!(screen.len(), h as usize);
        assert!(screen_contains(&screen, "STREAM"));
        assert!(screen_contains(&screen, "SUGGESTIONS"));
    }
}

#[test]
fn test_tiny_terminal_does_not_panic() {
    let mut app = App::new();
    app.alert = Some("Failed to load content details.".into());
    app.loading = true;
    render(&app, 20, 6);
}

// =============================================================================
// Suggestion Feed
// =============================================================================

#[test]
fn test_feed_loading_and_empty_states() {
    let mut app = App::new();
    app.feed.genre = Some(Genre::Trending);
    app.feed.loading = LoadingState::Loading(None);
    assert!(screen_contains(&render(&app, 100, 30), "Loading suggestions..."));

    app.feed.loading = LoadingState::Idle;
    assert!(screen_contains(&render(&app, 100, 30), MSG_NO_SUGGESTIONS));

    app.feed.loading = LoadingState::Error(MSG_SUGGESTIONS_FAILED.into());
    assert!(screen_contains(&render(&app, 100, 30), MSG_SUGGESTIONS_FAILED));
}

#[test]
fn test_feed_cards_show_badge_year_and_rating() {
    let mut app = App::new();
    app.feed.genre = Some(Genre::SciFi);
    app.feed.items = vec![
        item(438631, MediaType::Movie, "Dune", "2021-09-15"),
        item(95396, MediaType::Tv, "Severance", "2022-02-17"),
    ];
    app.feed.list.set_len(2);

    let screen = render(&app, 100, 30);
    assert!(screen_contains(&screen, "Sci-Fi"));
    assert!(screen_contains(&screen, "MOVIE"));
    assert!(screen_contains(&screen, "Dune"));
    assert!(screen_contains(&screen, "2021"));
    assert!(screen_contains(&screen, "★ 7.9"));
    assert!(screen_contains(&screen, "Severance"));
}

#[test]
fn test_focused_card_shows_poster_url() {
    let mut app = App::new();
    app.feed.genre = Some(Genre::Trending);
    let mut dune = item(438631, MediaType::Movie, "Dune", "2021-09-15");
    dune.poster_path = Some("/dune.jpg".into());
    app.feed.items = vec![dune, item(2, MediaType::Movie, "Heat", "1995-12-15")];
    app.feed.list.set_len(2);

    let url = "https://image.tmdb.org/t/p/w300/dune.jpg";
    assert!(!screen_contains(&render(&app, 120, 30), url));

    app.pane = Pane::Feed;
    assert!(screen_contains(&render(&app, 120, 30), url));
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_box_shows_query_and_filter() {
    let mut app = App::new();
    app.input_mode = InputMode::Editing;
    app.search.set_query("dune");

    let screen = render(&app, 100, 30);
    assert!(screen_contains(&screen, "dune"));
    assert!(screen_contains(&screen, "All"));
}

#[test]
fn test_autosuggest_panel_overlays_body() {
    let mut app = App::new();
    app.search.set_query("bre");
    app.search.suggestions = vec![item(1396, MediaType::Tv, "Breaking Bad", "2008-01-20")];
    app.search.panel_list.set_len(1);
    app.search.panel_visible = true;

    let screen = render(&app, 100, 30);
    assert!(screen_contains(&screen, "Breaking Bad"));
    assert!(screen_contains(&screen, "2008"));

    app.search.hide_panel();
    let screen = render(&app, 100, 30);
    assert!(!screen_contains(&screen, "Breaking Bad"));
}

#[test]
fn test_focused_result_shows_placeholder_poster() {
    let mut app = App::new();
    app.feed.visible = false;
    app.search.results = Some(vec![item(949, MediaType::Movie, "Heat", "1995-12-15")]);
    app.search.results_list.set_len(1);
    app.pane = Pane::Results;

    let screen = render(&app, 120, 30);
    assert!(screen_contains(&screen, "Heat"));
    assert!(screen_contains(&screen, "200x300?text=No+Image"));
}

#[test]
fn test_empty_results_message() {
    let mut app = App::new();
    app.feed.visible = false;
    app.search.results = Some(vec![]);
    app.pane = Pane::Results;

    let screen = render(&app, 100, 30);
    assert!(screen_contains(&screen, "RESULTS (0)"));
    assert!(screen_contains(&screen, MSG_NO_RESULTS));
}

// =============================================================================
// Selection / Playback
// =============================================================================

#[test]
fn test_episode_picker_lists_labels() {
    let mut app = App::new();
    app.feed.visible = false;
    app.selection = Some(Selection::new(1396, MediaType::Tv, "Breaking Bad"));
    app.picker.visible = true;
    app.picker.set_seasons(vec![
        SeasonSummary {
            season_number: -1,
            episode_count: 0,
        },
        SeasonSummary {
            season_number: 1,
            episode_count: 7,
        },
    ]);
    app.picker.set_episodes(vec![Episode {
        episode_number: 1,
        name: "Pilot".into(),
    }]);
    app.pane = Pane::Seasons;

    let screen = render(&app, 120, 30);
    assert!(screen_contains(&screen, "Select Season"));
    assert!(screen_contains(&screen, "Season 1 (7 episodes)"));
    assert!(!screen_contains(&screen, "Season -1"));
    assert!(screen_contains(&screen, "Episode 1: Pilot"));
}

#[test]
fn test_sources_and_player_panel() {
    let mut app = App::new();
    app.feed.visible = false;
    app.sources
        .set_sources(vec![source("Alpha", "HD", true), source("Beta", "SD", false)]);
    let first = app.sources.sources[0].clone();
    app.player.bind(&first, 0);

    let screen = render(&app, 120, 30);
    assert!(screen_contains(&screen, "Alpha"));
    assert!(screen_contains(&screen, "Beta"));
    assert!(screen_contains(&screen, "CC"));
    assert!(screen_contains(&screen, "Now Playing - Alpha"));
    assert!(screen_contains(&screen, "https://embed.example/alpha"));
}

#[test]
fn test_empty_sources_message() {
    let mut app = App::new();
    app.sources.set_sources(vec![]);

    let screen = render(&app, 120, 30);
    assert!(screen_contains(&screen, "No streaming sources found."));
    assert!(!screen_contains(&screen, "Now Playing"));
}

#[test]
fn test_fullscreen_player_takes_body() {
    let mut app = App::new();
    app.sources.set_sources(vec![source("Alpha", "HD", false)]);
    let first = app.sources.sources[0].clone();
    app.player.bind(&first, 0);
    app.set_fullscreen(true);

    let screen = render(&app, 120, 30);
    assert!(screen_contains(&screen, "FULLSCREEN"));
    assert!(!screen_contains(&screen, "SOURCES"));
}

// =============================================================================
// Overlays
// =============================================================================

#[test]
fn test_alert_popup_and_notice() {
    let mut app = App::new();
    app.alert = Some("IMDb ID not found for this movie.".into());
    let screen = render(&app, 100, 30);
    assert!(screen_contains(&screen, "ALERT"));
    assert!(screen_contains(&screen, "IMDb ID not found"));

    let mut app = App::new();
    app.notice = Some(MSG_SUBTITLES.into());
    let screen = render(&app, 200, 30);
    assert!(screen_contains(&screen, "Subtitle controls are available"));
}

#[test]
fn test_loading_popup() {
    let mut app = App::new();
    app.loading = true;
    assert!(screen_contains(&render(&app, 100, 30), "Loading..."));
}
