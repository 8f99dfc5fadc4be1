//! StreamAgg - terminal client for a media streaming aggregator backend
//!
//! Browse genre suggestions, search movies and TV shows, drill down to a
//! season and episode, resolve streaming sources and hand them to a player.
//!
//! # Modules
//!
//! - `models` - Typed projections of backend JSON
//! - `api` - HTTP client for the aggregator backend
//! - `app` - Application state, actions and effects
//! - `debounce` - Single-slot timer for autosuggest
//! - `runtime` - Orchestrator running effects and applying outcomes
//! - `player` - Player region state and external player control
//! - `ui` - TUI components
//! - `cli`, `commands`, `config` - Scriptable mode and user configuration

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod models;
pub mod player;
pub mod runtime;
pub mod ui;

// Re-export commonly used types
pub use models::{
    Episode, Genre, MediaType, SearchFilter, SeasonSummary, Selection, Source, StreamRequest,
    TitleDetail, TitleItem,
};

pub use api::{BackendClient, BackendError};
pub use app::{Action, App, Effect, Outcome};
pub use config::Config;
pub use player::{LocalPlayer, PlayerKind};
pub use runtime::{Orchestrator, RuntimeOptions};
