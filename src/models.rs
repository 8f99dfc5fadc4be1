//! Data structures and types for streamagg
//!
//! Contains all shared models used across the application organized by domain:
//! - **Catalog**: search/suggestion records, genres, media type filters
//! - **Detail**: title detail, seasons, episodes
//! - **Sources**: playable sources and the resolution request body
//! - **Selection**: the single live title/season/episode being resolved

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base URL of the poster image CDN
pub const IMAGE_CDN: &str = "https://image.tmdb.org/t/p";

// =============================================================================
// Catalog Models
// =============================================================================

/// Media type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Wire slug used in backend paths (`/api/movie/{id}`)
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Badge text shown on cards
    pub fn badge(&self) -> &'static str {
        match self {
            MediaType::Movie => "MOVIE",
            MediaType::Tv => "TV",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(format!("unknown media type: {}", other)),
        }
    }
}

/// Media type filter for search (`type=` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFilter {
    #[default]
    Multi,
    Movie,
    Tv,
}

impl SearchFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchFilter::Multi => "multi",
            SearchFilter::Movie => "movie",
            SearchFilter::Tv => "tv",
        }
    }

    /// Next filter in the selector cycle (multi -> movie -> tv -> multi)
    pub fn next(self) -> Self {
        match self {
            SearchFilter::Multi => SearchFilter::Movie,
            SearchFilter::Movie => SearchFilter::Tv,
            SearchFilter::Tv => SearchFilter::Multi,
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFilter::Multi => write!(f, "All"),
            SearchFilter::Movie => write!(f, "Movies"),
            SearchFilter::Tv => write!(f, "TV Shows"),
        }
    }
}

/// Genre tag for the suggestion feed tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Genre {
    #[default]
    #[serde(rename = "trending")]
    Trending,
    #[serde(rename = "action")]
    Action,
    #[serde(rename = "comedy")]
    Comedy,
    #[serde(rename = "drama")]
    Drama,
    #[serde(rename = "horror")]
    Horror,
    #[serde(rename = "sci-fi")]
    SciFi,
}

impl Genre {
    /// Fixed tab set, in display order
    pub const ALL: [Genre; 6] = [
        Genre::Trending,
        Genre::Action,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::SciFi,
    ];

    /// Wire slug (`/api/suggestions/{slug}`)
    pub fn slug(&self) -> &'static str {
        match self {
            Genre::Trending => "trending",
            Genre::Action => "action",
            Genre::Comedy => "comedy",
            Genre::Drama => "drama",
            Genre::Horror => "horror",
            Genre::SciFi => "sci-fi",
        }
    }

    /// Tab label
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Trending => "Trending",
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::SciFi => "Sci-Fi",
        }
    }

    /// Position of this genre in the tab set
    pub fn index(&self) -> usize {
        Genre::ALL.iter().position(|g| g == self).unwrap_or(0)
    }

    /// Tab to the right, wrapping
    pub fn next(self) -> Self {
        Genre::ALL[(self.index() + 1) % Genre::ALL.len()]
    }

    /// Tab to the left, wrapping
    pub fn prev(self) -> Self {
        let len = Genre::ALL.len();
        Genre::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.slug() == s.to_lowercase())
            .ok_or_else(|| format!("unknown genre: {}", s))
    }
}

/// Poster width preset on the image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
    /// Large card (`w300`)
    Card,
    /// Compact autosuggest row (`w92`)
    Thumb,
    /// Search result grid (`w300`, different placeholder)
    Grid,
}

impl PosterSize {
    fn preset(&self) -> &'static str {
        match self {
            PosterSize::Card | PosterSize::Grid => "w300",
            PosterSize::Thumb => "w92",
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            PosterSize::Card => "https://via.placeholder.com/300x450?text=No+Image",
            PosterSize::Thumb => "https://via.placeholder.com/40x60?text=No+Image",
            PosterSize::Grid => "https://via.placeholder.com/200x300?text=No+Image",
        }
    }
}

/// One search or suggestion record, projected from the backend item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleItem {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    /// Release date (movies) or first air date (TV), as sent
    pub date: Option<String>,
    pub vote_average: Option<f32>,
    pub poster_path: Option<String>,
}

impl TitleItem {
    /// Release year, if the date parses
    pub fn year(&self) -> Option<i32> {
        self.date.as_deref().and_then(extract_year)
    }

    /// Year or "N/A"
    pub fn year_label(&self) -> String {
        self.year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Rating with one decimal, or "N/A" when absent or zero
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{:.1}", v),
            _ => "N/A".to_string(),
        }
    }

    /// Poster URL at the given size, or the matching placeholder
    pub fn poster_url(&self, size: PosterSize) -> String {
        match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}/{}{}", IMAGE_CDN, size.preset(), path),
            _ => size.placeholder().to_string(),
        }
    }
}

impl fmt::Display for TitleItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

// =============================================================================
// Detail Models
// =============================================================================

/// Full title detail; only the external id is required by the selection flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleDetail {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
}

impl TitleDetail {
    /// IMDb cross-reference id, if present and non-empty
    pub fn imdb_id(&self) -> Option<&str> {
        self.external_ids
            .as_ref()
            .and_then(|e| e.imdb_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Display title (movies use `title`, TV uses `name`)
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// Nested external cross-reference ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
}

/// One entry of a TV show's season list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: i32,
    #[serde(default)]
    pub episode_count: u32,
}

impl SeasonSummary {
    /// Seasons indexed below zero are never offered
    pub fn is_selectable(&self) -> bool {
        self.season_number >= 0
    }
}

impl fmt::Display for SeasonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Season {} ({} episodes)",
            self.season_number, self.episode_count
        )
    }
}

/// TV episode entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_number: u32,
    #[serde(default)]
    pub name: String,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Episode {}: {}", self.episode_number, self.name)
    }
}

// =============================================================================
// Source Models
// =============================================================================

/// One playable stream option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub quality: String,
    #[serde(rename = "subtitles", default)]
    pub has_subtitles: bool,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.quality)?;
        if self.has_subtitles {
            write!(f, " CC")?;
        }
        Ok(())
    }
}

/// Body of `POST /api/stream`
///
/// Season and episode travel as strings, and are omitted for movies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRequest {
    pub imdb_id: String,
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
}

impl StreamRequest {
    pub fn movie(imdb_id: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            media_type: MediaType::Movie,
            season: None,
            episode: None,
        }
    }

    pub fn episode(imdb_id: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            media_type: MediaType::Tv,
            season: Some(season.to_string()),
            episode: Some(episode.to_string()),
        }
    }
}

// =============================================================================
// Selection
// =============================================================================

/// The title currently being resolved or played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub external_id: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl Selection {
    pub fn new(id: u64, media_type: MediaType, title: impl Into<String>) -> Self {
        Self {
            id,
            media_type,
            title: title.into(),
            external_id: None,
            season: None,
            episode: None,
        }
    }

    /// Resolution request for this selection, once it has everything it needs
    pub fn stream_request(&self) -> Option<StreamRequest> {
        let imdb_id = self.external_id.as_deref()?;
        match self.media_type {
            MediaType::Movie => Some(StreamRequest::movie(imdb_id)),
            MediaType::Tv => Some(StreamRequest::episode(
                imdb_id,
                self.season?,
                self.episode?,
            )),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let (Some(s), Some(e)) = (self.season, self.episode) {
            write!(f, " S{:02}E{:02}", s, e)?;
        }
        Ok(())
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<i32> {
    date.get(..4)?.parse().ok()
}

/// Format minutes as "2h 5m" or "45m"
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format an ISO date as "March 1, 2022"
pub fn format_date(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%B %-d, %Y").to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
