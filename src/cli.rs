//! CLI - Command Line Interface for StreamAgg
//!
//! Every step of the interactive flow is scriptable. All output is
//! JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search and inspect
//! streamagg search "severance" -t tv --json
//! streamagg info 95396 -t tv
//!
//! # Walk a show down to its sources
//! streamagg seasons 95396
//! streamagg episodes 95396 1
//! streamagg sources tt11280740 -s 1 -e 3
//!
//! # Full headless selection flow, then play
//! streamagg resolve 693134 -t movie
//! streamagg play "https://vidsrc.example/embed/movie/tt15239678" --player mpv
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::{Genre, MediaType, SearchFilter};
use crate::player::PlayerKind;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Backend returned 404
    NotFound = 4,
    /// No streaming sources available
    NoSources = 5,
    /// Detail response carried no IMDb id
    MissingExternalId = 6,
    /// Player failed to launch
    PlayerFailed = 7,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// StreamAgg - terminal client for a media streaming aggregator
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "streamagg",
    version,
    about = "Terminal client for a media streaming aggregator",
    long_about = "Browse suggestions, search movies and TV shows, pick a season \
                  and episode, resolve streaming sources and play them.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  streamagg                              Launch interactive TUI\n\
                  streamagg search \"dune\" -t movie       Search for content\n\
                  streamagg resolve 1396 -t tv -s 1 -e 1 Resolve an episode's sources\n\
                  streamagg suggestions sci-fi --json    Genre suggestions as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config and environment)
    #[arg(long, short = 'b', global = true)]
    pub backend: Option<String>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get suggestions for a genre tab
    #[command(visible_alias = "sg")]
    Suggestions(SuggestionsCmd),

    /// Get details for a movie or show
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List the seasons of a TV show
    Seasons(SeasonsCmd),

    /// List the episodes of a season
    #[command(visible_alias = "ep")]
    Episodes(EpisodesCmd),

    /// Resolve streaming sources for an IMDb id
    #[command(visible_alias = "src")]
    Sources(SourcesCmd),

    /// Run the full selection flow: detail, IMDb id, sources
    #[command(visible_alias = "r")]
    Resolve(ResolveCmd),

    /// Open a source URL in the local player
    #[command(visible_alias = "pl")]
    Play(PlayCmd),
}

// =============================================================================
// Search / Suggestions
// =============================================================================

/// Search for movies and TV shows by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Filter by media type
    #[arg(long = "type", short = 't', value_enum, default_value = "multi")]
    pub media_type: FilterArg,
}

/// Media type filter for search
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    Multi,
    Movie,
    Tv,
}

impl From<FilterArg> for SearchFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Multi => SearchFilter::Multi,
            FilterArg::Movie => SearchFilter::Movie,
            FilterArg::Tv => SearchFilter::Tv,
        }
    }
}

/// Get the suggestion feed for a genre
#[derive(Args, Debug)]
pub struct SuggestionsCmd {
    /// Genre tab (trending, action, comedy, drama, horror, sci-fi)
    #[arg(default_value = "trending", value_parser = parse_genre)]
    pub genre: Genre,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

fn parse_genre(s: &str) -> Result<Genre, String> {
    s.parse()
}

// =============================================================================
// Info / Seasons / Episodes
// =============================================================================

/// Media type of a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaArg {
    Movie,
    Tv,
}

impl From<MediaArg> for MediaType {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::Movie => MediaType::Movie,
            MediaArg::Tv => MediaType::Tv,
        }
    }
}

/// Get details for a title
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// Title id as returned by search
    pub id: u64,

    /// Media type
    #[arg(long = "type", short = 't', value_enum)]
    pub media_type: MediaArg,
}

/// List seasons of a TV show
#[derive(Args, Debug)]
pub struct SeasonsCmd {
    /// TV show id
    pub id: u64,
}

/// List episodes of one season
#[derive(Args, Debug)]
pub struct EpisodesCmd {
    /// TV show id
    pub id: u64,

    /// Season number
    pub season: u32,
}

// =============================================================================
// Sources / Resolve
// =============================================================================

/// Resolve streaming sources for an IMDb id
#[derive(Args, Debug)]
pub struct SourcesCmd {
    /// IMDb ID (e.g., tt0903747)
    #[arg(required = true)]
    pub imdb_id: String,

    /// Season number (TV only)
    #[arg(long, short = 's', requires = "episode")]
    pub season: Option<u32>,

    /// Episode number (TV only)
    #[arg(long, short = 'e', requires = "season")]
    pub episode: Option<u32>,
}

impl SourcesCmd {
    /// Episode coordinates when both are given
    pub fn episode_ref(&self) -> Option<(u32, u32)> {
        self.season.zip(self.episode)
    }
}

/// Resolve sources for a title id, headless
#[derive(Args, Debug)]
pub struct ResolveCmd {
    /// Title id as returned by search
    pub id: u64,

    /// Media type
    #[arg(long = "type", short = 't', value_enum)]
    pub media_type: MediaArg,

    /// Season number (TV only)
    #[arg(long, short = 's')]
    pub season: Option<u32>,

    /// Episode number (TV only)
    #[arg(long, short = 'e')]
    pub episode: Option<u32>,
}

impl ResolveCmd {
    /// TV resolution needs both coordinates
    pub fn validate(&self) -> Result<(), &'static str> {
        match (self.media_type, self.season, self.episode) {
            (MediaArg::Tv, Some(_), Some(_)) => Ok(()),
            (MediaArg::Tv, _, _) => Err("TV shows need both --season and --episode"),
            (MediaArg::Movie, None, None) => Ok(()),
            (MediaArg::Movie, _, _) => Err("--season/--episode only apply to TV shows"),
        }
    }
}

// =============================================================================
// Play
// =============================================================================

/// Player choice for the play command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerArg {
    Browser,
    Mpv,
    Vlc,
}

impl From<PlayerArg> for PlayerKind {
    fn from(arg: PlayerArg) -> Self {
        match arg {
            PlayerArg::Browser => PlayerKind::Browser,
            PlayerArg::Mpv => PlayerKind::Mpv,
            PlayerArg::Vlc => PlayerKind::Vlc,
        }
    }
}

/// Play a source URL locally
#[derive(Args, Debug)]
pub struct PlayCmd {
    /// Source URL
    #[arg(required = true)]
    pub url: String,

    /// Player to use (defaults to the configured one)
    #[arg(long, short = 'p', value_enum)]
    pub player: Option<PlayerArg>,

    /// Start in fullscreen
    #[arg(long, short = 'f')]
    pub fullscreen: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Render success data as a string
    pub fn render<T: Serialize>(&self, data: T) -> anyhow::Result<String> {
        let text = if self.json {
            serde_json::to_string_pretty(&JsonOutput::success(data))?
        } else {
            serde_json::to_string_pretty(&data)?
        };
        Ok(text)
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        println!("{}", self.render(data)?);
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        tracing::debug!(code = i32::from(code), %msg, "command failed");
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// IMDB ID Validation
// =============================================================================

/// Validate IMDB ID format (tt followed by digits)
pub fn validate_imdb_id(id: &str) -> Result<&str, &'static str> {
    match id.strip_prefix("tt") {
        Some(digits) if digits.len() >= 7 && digits.chars().all(|c| c.is_ascii_digit()) => Ok(id),
        _ => Err("Invalid IMDB ID format (expected tt followed by 7+ digits)"),
    }
}

// =============================================================================
// Tests
// =============================================================================
