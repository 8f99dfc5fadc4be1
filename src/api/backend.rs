//! Stream aggregator backend client
//!
//! Thin JSON client over the aggregator's HTTP API:
//! suggestions, search, title detail, seasons/episodes and source resolution.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    Episode, Genre, MediaType, SearchFilter, SeasonSummary, Source, StreamRequest, TitleDetail,
    TitleItem,
};

/// Default backend address (the aggregator's development server)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("streamagg/", env!("CARGO_PKG_VERSION"));

/// Backend API error types
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{}", status_message(.code, .message))]
    Status { code: u16, message: Option<String> },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IMDb ID not found for this {}", missing_id_noun(.0))]
    MissingExternalId(MediaType),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn status_message(code: &u16, message: &Option<String>) -> String {
    match message {
        Some(m) => format!("HTTP {}: {}", code, m),
        None => format!("HTTP {}", code),
    }
}

fn missing_id_noun(media_type: &MediaType) -> &'static str {
    match media_type {
        MediaType::Movie => "movie",
        MediaType::Tv => "TV show",
    }
}

impl BackendError {
    /// True for a 404 from the backend
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Status { code: 404, .. })
    }

    /// True when the request never produced an HTTP response
    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Aggregator backend client
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BackendClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::read(response).await
    }

    /// Decode a response body, mapping non-2xx statuses onto [`BackendError`]
    async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|e| BackendError::InvalidResponse(format!("JSON parse error: {}", e)));
        }

        let failure: Option<FailureBody> = serde_json::from_str(&body).ok();
        Err(match failure {
            // Suggestions report their failures as `success: false`
            Some(FailureBody {
                success: Some(false),
                error,
            }) => BackendError::Backend(error.unwrap_or_else(|| status_text(status))),
            Some(FailureBody { error, .. }) => BackendError::Status {
                code: status.as_u16(),
                message: error,
            },
            None => BackendError::Status {
                code: status.as_u16(),
                message: None,
            },
        })
    }

    /// Suggestions for one genre tab
    pub async fn suggestions(&self, genre: Genre) -> Result<Vec<TitleItem>> {
        let endpoint = format!("/api/suggestions/{}", genre.slug());
        let response: SuggestionsResponse = self.get(&endpoint).await?;

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(BackendError::Backend(message));
        }
        Ok(into_items(response.results))
    }

    /// Title search scoped to a media type filter
    pub async fn search(&self, query: &str, filter: SearchFilter) -> Result<Vec<TitleItem>> {
        let endpoint = format!(
            "/api/search?q={}&type={}",
            urlencoding::encode(query),
            filter.as_str()
        );
        let response: SearchResponse = self.get(&endpoint).await?;
        Ok(into_items(response.results))
    }

    /// Full detail for a movie or TV show
    pub async fn detail(&self, id: u64, media_type: MediaType) -> Result<TitleDetail> {
        let endpoint = format!("/api/{}/{}", media_type.as_str(), id);
        self.get(&endpoint).await
    }

    /// Detail lookup that requires the IMDb id, returned alongside the detail
    pub async fn external_id(&self, id: u64, media_type: MediaType) -> Result<(TitleDetail, String)> {
        let detail = self.detail(id, media_type).await?;
        let imdb_id = detail
            .imdb_id()
            .map(str::to_string)
            .ok_or(BackendError::MissingExternalId(media_type))?;
        Ok((detail, imdb_id))
    }

    /// Season list of a TV show
    pub async fn seasons(&self, tv_id: u64) -> Result<Vec<SeasonSummary>> {
        let endpoint = format!("/api/tv/{}/seasons", tv_id);
        let response: SeasonsResponse = self.get(&endpoint).await?;
        Ok(response.seasons)
    }

    /// Episode list of one season
    pub async fn episodes(&self, tv_id: u64, season: u32) -> Result<Vec<Episode>> {
        let endpoint = format!("/api/tv/{}/season/{}/episodes", tv_id, season);
        let response: EpisodesResponse = self.get(&endpoint).await?;
        Ok(response.episodes)
    }

    /// Resolve playable sources for a title (and episode, for TV)
    pub async fn stream(&self, request: &StreamRequest) -> Result<Vec<Source>> {
        let url = format!("{}/api/stream", self.base_url);
        tracing::debug!(%url, imdb_id = %request.imdb_id, "POST");

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let body: StreamResponse = Self::read(response).await?;
        match (body.sources, body.error) {
            (Some(sources), _) => Ok(sources),
            (None, Some(error)) => Err(BackendError::Backend(error)),
            (None, None) => Err(BackendError::InvalidResponse(
                "missing sources field".to_string(),
            )),
        }
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct FailureBody {
    success: Option<bool>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestionsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    results: Vec<ItemRaw>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ItemRaw>,
}

#[derive(Debug, Deserialize)]
struct SeasonsResponse {
    #[serde(default)]
    seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Deserialize)]
struct EpisodesResponse {
    #[serde(default)]
    episodes: Vec<Episode>,
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    sources: Option<Vec<Source>>,
    error: Option<String>,
}

fn into_items(raw: Vec<ItemRaw>) -> Vec<TitleItem> {
    raw.into_iter().filter_map(ItemRaw::into_item).collect()
}

#[derive(Debug, Deserialize)]
struct ItemRaw {
    id: u64,
    media_type: Option<String>,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
}

impl ItemRaw {
    fn into_item(self) -> Option<TitleItem> {
        // Filtered searches omit media_type; a "title" marks a movie
        let media_type = match self.media_type.as_deref() {
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            Some(_) => return None,
            None if self.title.is_some() => MediaType::Movie,
            None => MediaType::Tv,
        };

        Some(TitleItem {
            id: self.id,
            media_type,
            title: self.title.or(self.name).unwrap_or_default(),
            date: self
                .release_date
                .or(self.first_air_date)
                .filter(|d| !d.is_empty()),
            vote_average: self.vote_average,
            poster_path: self.poster_path,
        })
    }
}
