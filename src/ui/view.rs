//! View models
//!
//! Pure functions from app state to typed render data. Every interactive
//! element carries the [`Action`] it triggers, so widgets never rebuild
//! selection targets from display strings.

use crate::app::{
    Action, FeedState, LoadingState, MSG_LOADING_SUGGESTIONS, MSG_NO_RESULTS, MSG_NO_SUGGESTIONS,
    MSG_SUGGESTIONS_FAILED,
};
use crate::models::{Episode, Genre, PosterSize, SeasonSummary, Source, TitleItem};
use crate::player::PlayerState;

/// Large card in the genre suggestion feed
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionCard {
    pub title: String,
    pub year: String,
    pub rating: String,
    pub badge: &'static str,
    pub poster_url: String,
    pub target: Action,
}

/// State of the suggestion feed region
#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    Loading(&'static str),
    Empty(&'static str),
    Error(&'static str),
    Cards(Vec<SuggestionCard>),
}

/// Compact row in the autosuggest panel
#[derive(Debug, Clone, PartialEq)]
pub struct AutosuggestRow {
    pub title: String,
    pub year: String,
    pub thumb_url: String,
    pub target: Action,
}

/// Tile in the full search result grid
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTile {
    pub title: String,
    pub year: String,
    pub badge: &'static str,
    pub poster_url: String,
    pub target: Action,
}

/// State of the result grid
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Empty(&'static str),
    Tiles(Vec<ResultTile>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreTab {
    pub label: &'static str,
    pub active: bool,
    pub target: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonOption {
    pub label: String,
    pub target: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOption {
    pub label: String,
    pub target: Action,
}

/// One button in the source row
#[derive(Debug, Clone, PartialEq)]
pub struct SourceButton {
    pub name: String,
    pub quality: String,
    pub subtitles: bool,
    pub active: bool,
    pub target: Action,
}

/// The player region
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPanel {
    pub label: String,
    pub url: String,
    pub fullscreen: bool,
}

fn select_target(item: &TitleItem) -> Action {
    Action::SelectTitle {
        id: item.id,
        media_type: item.media_type,
        title: item.title.clone(),
    }
}

pub fn genre_tabs(active: Option<Genre>) -> Vec<GenreTab> {
    Genre::ALL
        .iter()
        .map(|genre| GenreTab {
            label: genre.label(),
            active: active == Some(*genre),
            target: Action::SelectGenre(*genre),
        })
        .collect()
}

pub fn suggestion_card(item: &TitleItem) -> SuggestionCard {
    SuggestionCard {
        title: item.title.clone(),
        year: item.year_label(),
        rating: item.rating_label(),
        badge: item.media_type.badge(),
        poster_url: item.poster_url(PosterSize::Card),
        target: select_target(item),
    }
}

pub fn feed_view(feed: &FeedState) -> FeedView {
    match &feed.loading {
        LoadingState::Loading(_) => FeedView::Loading(MSG_LOADING_SUGGESTIONS),
        LoadingState::Error(_) => FeedView::Error(MSG_SUGGESTIONS_FAILED),
        LoadingState::Idle if feed.items.is_empty() => FeedView::Empty(MSG_NO_SUGGESTIONS),
        LoadingState::Idle => FeedView::Cards(feed.items.iter().map(suggestion_card).collect()),
    }
}

pub fn autosuggest_row(item: &TitleItem) -> AutosuggestRow {
    AutosuggestRow {
        title: item.title.clone(),
        year: item.year_label(),
        thumb_url: item.poster_url(PosterSize::Thumb),
        target: select_target(item),
    }
}

pub fn autosuggest_rows(items: &[TitleItem]) -> Vec<AutosuggestRow> {
    items.iter().map(autosuggest_row).collect()
}

pub fn result_tile(item: &TitleItem) -> ResultTile {
    ResultTile {
        title: item.title.clone(),
        year: item.year_label(),
        badge: item.media_type.badge(),
        poster_url: item.poster_url(PosterSize::Grid),
        target: Action::OpenResult {
            id: item.id,
            media_type: item.media_type,
            title: item.title.clone(),
        },
    }
}

pub fn results_view(items: &[TitleItem]) -> ResultsView {
    if items.is_empty() {
        return ResultsView::Empty(MSG_NO_RESULTS);
    }
    ResultsView::Tiles(items.iter().map(result_tile).collect())
}

/// Season choice; negative season numbers are never offered
pub fn season_option(season: &SeasonSummary) -> Option<SeasonOption> {
    let number = u32::try_from(season.season_number).ok()?;
    Some(SeasonOption {
        label: season.to_string(),
        target: Action::SelectSeason(number),
    })
}

pub fn season_options(seasons: &[SeasonSummary]) -> Vec<SeasonOption> {
    seasons.iter().filter_map(season_option).collect()
}

pub fn episode_option(episode: &Episode) -> EpisodeOption {
    EpisodeOption {
        label: episode.to_string(),
        target: Action::SelectEpisode(episode.episode_number),
    }
}

pub fn episode_options(episodes: &[Episode]) -> Vec<EpisodeOption> {
    episodes.iter().map(episode_option).collect()
}

pub fn source_button(index: usize, source: &Source, player: &PlayerState) -> SourceButton {
    SourceButton {
        name: source.name.clone(),
        quality: source.quality.clone(),
        subtitles: source.has_subtitles,
        active: player.is_active(index),
        target: Action::PlaySource(index),
    }
}

/// Source buttons; at most one is active
pub fn source_buttons(sources: &[Source], player: &PlayerState) -> Vec<SourceButton> {
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| source_button(index, source, player))
        .collect()
}

pub fn player_panel(player: &PlayerState) -> Option<PlayerPanel> {
    if !player.visible {
        return None;
    }
    Some(PlayerPanel {
        label: player.label.clone().unwrap_or_default(),
        url: player.url.clone().unwrap_or_default(),
        fullscreen: player.fullscreen,
    })
}
