//! CLI Command Handlers
//!
//! Implements all CLI commands against the aggregator backend.
//! Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;

use crate::api::{BackendClient, BackendError};
use crate::cli::{
    EpisodesCmd, ExitCode, InfoCmd, Output, PlayCmd, ResolveCmd, SearchCmd, SeasonsCmd,
    SourcesCmd, SuggestionsCmd,
};
use crate::config::Config;
use crate::models::{
    format_date, format_runtime, MediaType, SearchFilter, Selection, Source, StreamRequest,
    TitleDetail,
};
use crate::player::{LocalPlayer, PlayerKind};

/// Map a backend failure onto a semantic exit code
pub fn exit_code_for(err: &BackendError) -> ExitCode {
    match err {
        BackendError::MissingExternalId(_) => ExitCode::MissingExternalId,
        e if e.is_not_found() => ExitCode::NotFound,
        BackendError::Transport(_) | BackendError::Status { .. } => ExitCode::NetworkError,
        BackendError::Backend(_) | BackendError::InvalidResponse(_) => ExitCode::Error,
    }
}

/// Describe a backend failure, pointing at the backend URL when it was unreachable
fn failure_message(client: &BackendClient, context: &str, err: &BackendError) -> String {
    if err.is_transport() {
        format!(
            "{}: {} (is the backend running at {}?)",
            context,
            err,
            client.base_url()
        )
    } else {
        format!("{}: {}", context, err)
    }
}

fn backend_failure(
    output: &Output,
    client: &BackendClient,
    context: &str,
    err: &BackendError,
) -> ExitCode {
    output.error(failure_message(client, context, err), exit_code_for(err))
}

fn print_or_fail<T: Serialize>(output: &Output, data: T) -> ExitCode {
    match output.print(data) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Search / Suggestions
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, client: &BackendClient, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }
    let filter = SearchFilter::from(cmd.media_type);
    output.info(format!("Searching {} for: {}", filter, query));

    match client.search(query, filter).await {
        Ok(mut results) => {
            results.truncate(cmd.limit);
            print_or_fail(output, &results)
        }
        Err(e) => backend_failure(output, client, "Search failed", &e),
    }
}

pub async fn suggestions_cmd(
    cmd: SuggestionsCmd,
    client: &BackendClient,
    output: &Output,
) -> ExitCode {
    output.info(format!("Fetching {} suggestions...", cmd.genre.label()));

    match client.suggestions(cmd.genre).await {
        Ok(mut results) => {
            results.truncate(cmd.limit);
            print_or_fail(output, &results)
        }
        Err(e) => backend_failure(output, client, "Failed to load suggestions", &e),
    }
}

// =============================================================================
// Info / Seasons / Episodes
// =============================================================================

/// Detail plus human-readable fields
#[derive(Debug, Serialize)]
pub struct InfoOutput {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
}

impl InfoOutput {
    pub fn new(detail: &TitleDetail, media_type: MediaType) -> Self {
        let date = detail
            .release_date
            .as_deref()
            .or(detail.first_air_date.as_deref());
        Self {
            id: detail.id,
            media_type,
            title: detail.display_title().to_string(),
            imdb_id: detail.imdb_id().map(str::to_string),
            overview: detail.overview.clone().filter(|o| !o.is_empty()),
            runtime: detail.runtime.filter(|m| *m > 0).map(format_runtime),
            released: date.and_then(format_date),
        }
    }
}

pub async fn info_cmd(cmd: InfoCmd, client: &BackendClient, output: &Output) -> ExitCode {
    let media_type = MediaType::from(cmd.media_type);
    output.info(format!("Getting info for {} {}", media_type, cmd.id));

    match client.detail(cmd.id, media_type).await {
        Ok(detail) => print_or_fail(output, InfoOutput::new(&detail, media_type)),
        Err(e) => backend_failure(output, client, "Failed to load details", &e),
    }
}

pub async fn seasons_cmd(cmd: SeasonsCmd, client: &BackendClient, output: &Output) -> ExitCode {
    match client.seasons(cmd.id).await {
        Ok(mut seasons) => {
            seasons.retain(|s| s.is_selectable());
            print_or_fail(output, &seasons)
        }
        Err(e) => backend_failure(output, client, "Failed to load seasons", &e),
    }
}

pub async fn episodes_cmd(cmd: EpisodesCmd, client: &BackendClient, output: &Output) -> ExitCode {
    match client.episodes(cmd.id, cmd.season).await {
        Ok(episodes) => print_or_fail(output, &episodes),
        Err(e) => backend_failure(output, client, "Failed to load episodes", &e),
    }
}

// =============================================================================
// Sources / Resolve
// =============================================================================

pub async fn sources_cmd(cmd: SourcesCmd, client: &BackendClient, output: &Output) -> ExitCode {
    let request = match cmd.episode_ref() {
        Some((season, episode)) => StreamRequest::episode(&cmd.imdb_id, season, episode),
        None => StreamRequest::movie(&cmd.imdb_id),
    };
    fetch_sources(&request, client, output)
        .await
        .map_or_else(|code| code, |sources| print_or_fail(output, &sources))
}

/// Result of a headless selection flow
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    pub selection: Selection,
    pub sources: Vec<Source>,
}

pub async fn resolve_cmd(cmd: ResolveCmd, client: &BackendClient, output: &Output) -> ExitCode {
    if let Err(e) = cmd.validate() {
        return output.error(e, ExitCode::InvalidArgs);
    }
    let media_type = MediaType::from(cmd.media_type);

    let (detail, imdb_id) = match client.external_id(cmd.id, media_type).await {
        Ok(found) => found,
        Err(e @ BackendError::MissingExternalId(_)) => {
            return output.error(e.to_string(), exit_code_for(&e))
        }
        Err(e) => {
            return backend_failure(output, client, "Failed to load details", &e)
        }
    };

    let mut selection = Selection::new(cmd.id, media_type, detail.display_title());
    selection.external_id = Some(imdb_id);
    selection.season = cmd.season;
    selection.episode = cmd.episode;
    let Some(request) = selection.stream_request() else {
        return output.error("Incomplete selection", ExitCode::InvalidArgs);
    };
    output.info(format!("Resolving sources for {}", selection));

    match fetch_sources(&request, client, output).await {
        Ok(sources) => print_or_fail(output, ResolveOutput { selection, sources }),
        Err(code) => code,
    }
}

async fn fetch_sources(
    request: &StreamRequest,
    client: &BackendClient,
    output: &Output,
) -> Result<Vec<Source>, ExitCode> {
    match client.stream(request).await {
        Ok(sources) if sources.is_empty() => {
            Err(output.error("No streaming sources found", ExitCode::NoSources))
        }
        Ok(sources) => {
            output.info(format!("Found {} sources", sources.len()));
            Ok(sources)
        }
        Err(e) => Err(backend_failure(output, client, "Failed to load streaming sources", &e)),
    }
}

// =============================================================================
// Play
// =============================================================================

#[derive(Debug, Serialize)]
struct PlayOutput<'a> {
    url: &'a str,
    player: &'static str,
    fullscreen: bool,
}

pub async fn play_cmd(cmd: PlayCmd, config: &Config, output: &Output) -> ExitCode {
    let mut player = match cmd.player {
        Some(choice) => LocalPlayer::new(PlayerKind::from(choice)),
        None => config.local_player(),
    };
    let kind = player.kind();

    if !player.is_available().await {
        return output.error(
            format!("{} is not installed or not in PATH", kind.display_name()),
            ExitCode::PlayerFailed,
        );
    }

    output.info(format!("Opening in {}...", kind.display_name()));
    if let Err(e) = player.play_and_wait(&cmd.url, cmd.fullscreen).await {
        return output.error(format!("Failed to start player: {}", e), ExitCode::PlayerFailed);
    }

    print_or_fail(
        output,
        PlayOutput {
            url: &cmd.url,
            player: kind.display_name(),
            fullscreen: cmd.fullscreen,
        },
    )
}
