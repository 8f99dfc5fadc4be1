//! App state and core application logic
//!
//! Holds every UI region's state in one explicit struct. User input arrives
//! as [`Action`]s, completed requests as [`Outcome`]s; both mutate state
//! synchronously and hand back the [`Effect`]s the runtime must perform.

use crate::api::BackendError;
use crate::models::*;
use crate::player::PlayerState;
use crate::ui::view;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// =============================================================================
// Messages
// =============================================================================

pub const MSG_LOADING_SUGGESTIONS: &str = "Loading suggestions...";
pub const MSG_NO_SUGGESTIONS: &str = "No suggestions available.";
pub const MSG_SUGGESTIONS_FAILED: &str = "Failed to load suggestions. Please try again.";
pub const MSG_NO_RESULTS: &str = "No results found.";
pub const MSG_SEARCH_FAILED: &str = "Search failed. Please try again.";
pub const MSG_DETAIL_FAILED: &str = "Failed to load content details.";
pub const MSG_SOURCES_FAILED: &str = "Failed to load streaming sources.";
pub const MSG_SUBTITLES: &str = "Subtitle controls are available within the video player. Look for CC or subtitle buttons in the player interface.";

/// Required-field alert for a detail response without an IMDb id
pub fn missing_imdb_message(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Movie => "IMDb ID not found for this movie.",
        MediaType::Tv => "IMDb ID not found for this TV show.",
    }
}

// =============================================================================
// Input Mode / Focus
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

/// Region that receives navigation keys in normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Search,
    Autosuggest,
    Feed,
    Results,
    Seasons,
    Episodes,
    Sources,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading(Option<String>),
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// List Cursor
// =============================================================================

/// Cursor over a list region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub selected: usize,
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    /// Update length, clamping the cursor
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// New contents: length replaced, cursor back to the top
    pub fn reset(&mut self, len: usize) {
        self.selected = 0;
        self.len = len;
    }
}

// =============================================================================
// Region States
// =============================================================================

/// Genre suggestion feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    /// Whether the suggestion section is shown at all
    pub visible: bool,
    /// Active tab; `None` until a tab is chosen
    pub genre: Option<Genre>,
    pub loading: LoadingState,
    pub items: Vec<TitleItem>,
    pub list: ListState,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            visible: true,
            genre: None,
            loading: LoadingState::Idle,
            items: Vec::new(),
            list: ListState::default(),
        }
    }
}

impl FeedState {
    pub fn selected_item(&self) -> Option<&TitleItem> {
        self.items.get(self.list.selected)
    }
}

/// Search box, autosuggest panel and result grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    /// Cursor position in `query`, in chars
    pub cursor: usize,
    pub filter: SearchFilter,
    pub panel_visible: bool,
    pub suggestions: Vec<TitleItem>,
    pub panel_list: ListState,
    /// `None` until a full search has completed
    pub results: Option<Vec<TitleItem>>,
    pub results_list: ListState,
}

impl SearchState {
    fn byte_index(&self) -> usize {
        self.query
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.query.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.query.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index();
            self.query.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Replace the query text, cursor at end
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.cursor_end();
    }

    pub fn hide_panel(&mut self) {
        self.panel_visible = false;
    }

    pub fn selected_suggestion(&self) -> Option<&TitleItem> {
        self.suggestions.get(self.panel_list.selected)
    }

    pub fn selected_result(&self) -> Option<&TitleItem> {
        self.results
            .as_ref()
            .and_then(|r| r.get(self.results_list.selected))
    }
}

/// Season and episode choosers (TV only)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodePicker {
    pub visible: bool,
    /// Selectable seasons only (negative indices removed)
    pub seasons: Vec<SeasonSummary>,
    pub season_list: ListState,
    pub episodes: Vec<Episode>,
    pub episode_list: ListState,
}

impl EpisodePicker {
    pub fn set_seasons(&mut self, seasons: Vec<SeasonSummary>) {
        self.seasons = seasons.into_iter().filter(|s| s.is_selectable()).collect();
        self.season_list.reset(self.seasons.len());
        self.clear_episodes();
    }

    pub fn set_episodes(&mut self, episodes: Vec<Episode>) {
        self.episode_list.reset(episodes.len());
        self.episodes = episodes;
    }

    pub fn clear_episodes(&mut self) {
        self.episodes.clear();
        self.episode_list.reset(0);
    }

    pub fn selected_season(&self) -> Option<&SeasonSummary> {
        self.seasons.get(self.season_list.selected)
    }

    pub fn selected_episode(&self) -> Option<&Episode> {
        self.episodes.get(self.episode_list.selected)
    }
}

/// Source button row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcesState {
    pub visible: bool,
    pub sources: Vec<Source>,
    pub list: ListState,
}

impl SourcesState {
    /// Replace the list wholesale
    pub fn set_sources(&mut self, sources: Vec<Source>) {
        self.list.reset(sources.len());
        self.sources = sources;
        self.visible = true;
    }
}

// =============================================================================
// Actions, Effects, Outcomes
// =============================================================================

/// One named variant per user action
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    QueryChanged(String),
    SubmitSearch,
    SetFilter(SearchFilter),
    SelectGenre(Genre),
    RefreshSuggestions,
    /// Pick from a suggestion card or the autosuggest panel
    SelectTitle {
        id: u64,
        media_type: MediaType,
        title: String,
    },
    /// Pick from the search result grid
    OpenResult {
        id: u64,
        media_type: MediaType,
        title: String,
    },
    SelectSeason(u32),
    SelectEpisode(u32),
    PlaySource(usize),
    ToggleFullscreen,
    ToggleSubtitles,
    DismissSuggestions,
    ClickOutsideSearch,
    FocusSearch,
    DismissAlert,
    Quit,
}

/// Side effect requested by a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchSuggestions(Genre),
    ScheduleAutosuggest { query: String, filter: SearchFilter },
    CancelAutosuggest,
    Search { query: String, filter: SearchFilter },
    FetchDetail { id: u64, media_type: MediaType },
    FetchSeasons { tv_id: u64 },
    FetchEpisodes { tv_id: u64, season: u32 },
    ResolveSources(StreamRequest),
    BindPlayer { url: String },
    RequestFullscreen,
}

/// A completed backend request
#[derive(Debug)]
pub enum Outcome {
    Suggestions {
        genre: Genre,
        result: Result<Vec<TitleItem>, BackendError>,
    },
    Autosuggest {
        query: String,
        result: Result<Vec<TitleItem>, BackendError>,
    },
    Search {
        query: String,
        result: Result<Vec<TitleItem>, BackendError>,
    },
    Detail {
        id: u64,
        media_type: MediaType,
        result: Result<TitleDetail, BackendError>,
    },
    Seasons {
        tv_id: u64,
        result: Result<Vec<SeasonSummary>, BackendError>,
    },
    Episodes {
        tv_id: u64,
        season: u32,
        result: Result<Vec<Episode>, BackendError>,
    },
    Sources {
        request: StreamRequest,
        result: Result<Vec<Source>, BackendError>,
    },
}

// =============================================================================
// Main Application State
// =============================================================================

/// Tunables the state machine needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub min_query_len: usize,
    pub autosuggest_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            autosuggest_limit: 5,
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct App {
    pub running: bool,
    pub input_mode: InputMode,
    pub pane: Pane,
    pub settings: Settings,

    pub feed: FeedState,
    pub search: SearchState,
    pub selection: Option<Selection>,
    pub picker: EpisodePicker,
    pub sources: SourcesState,
    pub player: PlayerState,

    /// Global loading indicator
    pub loading: bool,
    /// Blocking alert; swallows input until dismissed
    pub alert: Option<String>,
    /// Informational notice shown in the status bar
    pub notice: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            running: true,
            settings,
            ..Default::default()
        }
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Apply a user action, returning the effects to run
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::QueryChanged(text) => self.query_changed(text),
            Action::SubmitSearch => self.submit_search(),
            Action::SetFilter(filter) => {
                self.search.filter = filter;
                vec![]
            }
            Action::SelectGenre(genre) => {
                self.feed.genre = Some(genre);
                self.feed.visible = true;
                self.load_suggestions(genre)
            }
            Action::RefreshSuggestions => {
                let genre = self.feed.genre.unwrap_or_default();
                self.load_suggestions(genre)
            }
            Action::SelectTitle {
                id,
                media_type,
                title,
            } => {
                self.search.set_query(title.clone());
                self.search.hide_panel();
                self.feed.visible = false;
                let mut effects = vec![Effect::CancelAutosuggest];
                effects.extend(self.load_content(id, media_type, title));
                effects
            }
            Action::OpenResult {
                id,
                media_type,
                title,
            } => self.load_content(id, media_type, title),
            Action::SelectSeason(season) => self.select_season(season),
            Action::SelectEpisode(episode) => self.select_episode(episode),
            Action::PlaySource(index) => self.play_source(index),
            Action::ToggleFullscreen => vec![Effect::RequestFullscreen],
            Action::ToggleSubtitles => {
                self.notice = Some(MSG_SUBTITLES.to_string());
                vec![]
            }
            Action::DismissSuggestions | Action::ClickOutsideSearch => {
                self.search.hide_panel();
                if self.pane == Pane::Autosuggest {
                    self.pane = Pane::Search;
                }
                vec![]
            }
            Action::FocusSearch => {
                self.input_mode = InputMode::Editing;
                self.pane = Pane::Search;
                vec![]
            }
            Action::DismissAlert => {
                self.alert = None;
                vec![]
            }
            Action::Quit => {
                self.running = false;
                vec![]
            }
        }
    }

    fn query_changed(&mut self, text: String) -> Vec<Effect> {
        if text != self.search.query {
            self.search.set_query(text);
        }
        let query = self.search.query.trim();
        if query.chars().count() < self.settings.min_query_len {
            self.search.hide_panel();
            return vec![Effect::CancelAutosuggest];
        }
        vec![Effect::ScheduleAutosuggest {
            query: query.to_string(),
            filter: self.search.filter,
        }]
    }

    fn submit_search(&mut self) -> Vec<Effect> {
        let query = self.search.query.trim().to_string();
        if query.is_empty() {
            return vec![];
        }
        self.loading = true;
        self.feed.visible = false;
        // Focus leaves the search box for the result grid
        self.search.hide_panel();
        self.input_mode = InputMode::Normal;
        self.pane = Pane::Results;
        vec![
            Effect::CancelAutosuggest,
            Effect::Search {
                query,
                filter: self.search.filter,
            },
        ]
    }

    fn load_suggestions(&mut self, genre: Genre) -> Vec<Effect> {
        self.feed.loading = LoadingState::Loading(Some(MSG_LOADING_SUGGESTIONS.to_string()));
        self.feed.items.clear();
        self.feed.list.reset(0);
        vec![Effect::FetchSuggestions(genre)]
    }

    /// Replace the live selection and start resolving it
    fn load_content(&mut self, id: u64, media_type: MediaType, title: String) -> Vec<Effect> {
        self.loading = true;
        self.selection = Some(Selection::new(id, media_type, title));
        self.picker = EpisodePicker::default();
        vec![Effect::FetchDetail { id, media_type }]
    }

    fn select_season(&mut self, season: u32) -> Vec<Effect> {
        let Some(selection) = self.selection.as_mut() else {
            return vec![];
        };
        if selection.media_type != MediaType::Tv {
            return vec![];
        }
        selection.season = Some(season);
        selection.episode = None;
        // Any resolution still in flight belongs to the previous episode
        self.loading = false;
        self.picker.clear_episodes();
        vec![Effect::FetchEpisodes {
            tv_id: selection.id,
            season,
        }]
    }

    fn select_episode(&mut self, episode: u32) -> Vec<Effect> {
        let Some(selection) = self.selection.as_mut() else {
            return vec![];
        };
        if selection.media_type != MediaType::Tv || selection.season.is_none() {
            return vec![];
        }
        selection.episode = Some(episode);
        match selection.stream_request() {
            Some(request) => {
                self.loading = true;
                vec![Effect::ResolveSources(request)]
            }
            None => vec![],
        }
    }

    fn play_source(&mut self, index: usize) -> Vec<Effect> {
        let Some(source) = self.sources.sources.get(index) else {
            return vec![];
        };
        self.player.bind(source, index);
        self.sources.list.selected = index;
        // Bring the player region into view
        self.pane = Pane::Sources;
        self.input_mode = InputMode::Normal;
        vec![Effect::BindPlayer {
            url: source.url.clone(),
        }]
    }

    // -------------------------------------------------------------------------
    // Outcomes
    // -------------------------------------------------------------------------

    /// Fold a completed request into state, returning follow-up effects
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::Suggestions { genre, result } => {
                match result {
                    Ok(items) => {
                        self.feed.list.reset(items.len());
                        self.feed.items = items;
                        self.feed.loading = LoadingState::Idle;
                    }
                    Err(e) => {
                        tracing::warn!(genre = %genre, error = %e, "suggestions failed");
                        self.feed.items.clear();
                        self.feed.list.reset(0);
                        self.feed.loading = LoadingState::Error(MSG_SUGGESTIONS_FAILED.to_string());
                    }
                }
                vec![]
            }
            Outcome::Autosuggest { query, result } => {
                match result {
                    Ok(mut items) => {
                        items.truncate(self.settings.autosuggest_limit);
                        self.search.panel_visible = !items.is_empty();
                        self.search.panel_list.reset(items.len());
                        self.search.suggestions = items;
                    }
                    Err(e) => tracing::warn!(%query, error = %e, "autosuggest failed"),
                }
                vec![]
            }
            Outcome::Search { query, result } => {
                self.loading = false;
                match result {
                    Ok(items) => {
                        self.search.results_list.reset(items.len());
                        self.search.results = Some(items);
                    }
                    Err(e) => {
                        tracing::warn!(%query, error = %e, "search failed");
                        self.alert = Some(MSG_SEARCH_FAILED.to_string());
                    }
                }
                vec![]
            }
            Outcome::Detail {
                id,
                media_type,
                result,
            } => self.apply_detail(id, media_type, result),
            Outcome::Seasons { tv_id, result } => {
                if !self.is_current(tv_id, MediaType::Tv) {
                    return vec![];
                }
                self.loading = false;
                match result {
                    Ok(seasons) => self.picker.set_seasons(seasons),
                    Err(e) => tracing::warn!(tv_id, error = %e, "season list failed"),
                }
                self.picker.visible = true;
                vec![]
            }
            Outcome::Episodes {
                tv_id,
                season,
                result,
            } => {
                let current_season = self.selection.as_ref().and_then(|s| s.season);
                if !self.is_current(tv_id, MediaType::Tv) || current_season != Some(season) {
                    return vec![];
                }
                match result {
                    Ok(episodes) => self.picker.set_episodes(episodes),
                    Err(e) => tracing::warn!(tv_id, season, error = %e, "episode list failed"),
                }
                vec![]
            }
            Outcome::Sources { request, result } => {
                if !self.is_current_request(&request) {
                    tracing::debug!(imdb_id = %request.imdb_id, "sources for a replaced selection");
                    return vec![];
                }
                self.loading = false;
                match result {
                    Ok(sources) => {
                        tracing::info!(imdb_id = %request.imdb_id, count = sources.len(), "sources resolved");
                        self.sources.set_sources(sources);
                        if self.sources.sources.is_empty() {
                            self.pane = Pane::Sources;
                            vec![]
                        } else {
                            self.play_source(0)
                        }
                    }
                    Err(e) => {
                        tracing::warn!(imdb_id = %request.imdb_id, error = %e, "source resolution failed");
                        self.alert = Some(MSG_SOURCES_FAILED.to_string());
                        vec![]
                    }
                }
            }
        }
    }

    fn apply_detail(
        &mut self,
        id: u64,
        media_type: MediaType,
        result: Result<TitleDetail, BackendError>,
    ) -> Vec<Effect> {
        if !self.is_current(id, media_type) {
            return vec![];
        }

        let detail = match result {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(id, error = %e, "detail failed");
                self.loading = false;
                self.alert = Some(MSG_DETAIL_FAILED.to_string());
                return vec![];
            }
        };

        let Some(imdb_id) = detail.imdb_id().map(str::to_string) else {
            self.loading = false;
            self.alert = Some(missing_imdb_message(media_type).to_string());
            return vec![];
        };

        let Some(selection) = self.selection.as_mut() else {
            return vec![];
        };
        selection.external_id = Some(imdb_id.clone());

        match media_type {
            MediaType::Movie => {
                self.picker.visible = false;
                vec![Effect::ResolveSources(StreamRequest::movie(imdb_id))]
            }
            MediaType::Tv => {
                self.pane = Pane::Seasons;
                self.input_mode = InputMode::Normal;
                vec![Effect::FetchSeasons { tv_id: id }]
            }
        }
    }

    fn is_current_request(&self, request: &StreamRequest) -> bool {
        self.selection
            .as_ref()
            .and_then(Selection::stream_request)
            .is_some_and(|live| live == *request)
    }

    fn is_current(&self, id: u64, media_type: MediaType) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.id == id && s.media_type == media_type)
    }

    /// Record that a fullscreen variant took effect
    pub fn set_fullscreen(&mut self, on: bool) {
        self.player.fullscreen = on;
    }

    // -------------------------------------------------------------------------
    // Focus Cycling
    // -------------------------------------------------------------------------

    fn visible_panes(&self) -> Vec<Pane> {
        let mut panes = vec![Pane::Search];
        if self.feed.visible {
            panes.push(Pane::Feed);
        }
        if self.search.results.is_some() {
            panes.push(Pane::Results);
        }
        if self.picker.visible {
            panes.push(Pane::Seasons);
            if !self.picker.episodes.is_empty() {
                panes.push(Pane::Episodes);
            }
        }
        if self.sources.visible {
            panes.push(Pane::Sources);
        }
        panes
    }

    fn cycle_focus(&mut self) {
        let panes = self.visible_panes();
        let current = match self.pane {
            Pane::Autosuggest => Pane::Search,
            other => other,
        };
        let pos = panes.iter().position(|p| *p == current).unwrap_or(0);
        self.pane = panes[(pos + 1) % panes.len()];
        self.input_mode = if self.pane == Pane::Search {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Translate a key press into an action, moving cursors as a side effect
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl_or_cmd = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        // Blocking alert swallows everything except its dismissal
        if self.alert.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::DismissAlert),
                _ => None,
            };
        }

        if ctrl_or_cmd && matches!(key.code, KeyCode::Char('k') | KeyCode::Char('K')) {
            return Some(Action::FocusSearch);
        }

        self.notice = None;

        if key.code == KeyCode::Esc {
            return self.handle_escape();
        }
        if key.code == KeyCode::Tab {
            let leaving_search = self.pane == Pane::Search;
            self.cycle_focus();
            return leaving_search.then_some(Action::ClickOutsideSearch);
        }

        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_escape(&mut self) -> Option<Action> {
        if self.search.panel_visible {
            return Some(Action::DismissSuggestions);
        }
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
        }
        None
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => Some(Action::SubmitSearch),
            KeyCode::Char(c) => {
                self.search.insert(c);
                Some(Action::QueryChanged(self.search.query.clone()))
            }
            KeyCode::Backspace => {
                self.search.backspace();
                Some(Action::QueryChanged(self.search.query.clone()))
            }
            KeyCode::Delete => {
                self.search.delete();
                Some(Action::QueryChanged(self.search.query.clone()))
            }
            KeyCode::Left => {
                self.search.cursor_left();
                None
            }
            KeyCode::Right => {
                self.search.cursor_right();
                None
            }
            KeyCode::Home => {
                self.search.cursor_home();
                None
            }
            KeyCode::End => {
                self.search.cursor_end();
                None
            }
            KeyCode::Down if self.search.panel_visible => {
                self.input_mode = InputMode::Normal;
                self.pane = Pane::Autosuggest;
                self.search.panel_list.first();
                None
            }
            _ => None,
        }
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('/') | KeyCode::Char('s') => return Some(Action::FocusSearch),
            KeyCode::Char('r') => return Some(Action::RefreshSuggestions),
            KeyCode::Char('f') => return Some(Action::ToggleFullscreen),
            KeyCode::Char('t') => return Some(Action::ToggleSubtitles),
            KeyCode::Char('m') => return Some(Action::SetFilter(self.search.filter.next())),
            KeyCode::Char(c @ '1'..='9') if self.sources.visible => {
                return Some(Action::PlaySource(c as usize - '1' as usize));
            }
            KeyCode::Left | KeyCode::Right if self.pane != Pane::Sources => {
                let active = self.feed.genre.unwrap_or_default();
                let genre = if key.code == KeyCode::Left {
                    active.prev()
                } else {
                    active.next()
                };
                return Some(Action::SelectGenre(genre));
            }
            _ => {}
        }

        match self.pane {
            Pane::Search => match key.code {
                KeyCode::Enter => Some(Action::FocusSearch),
                _ => None,
            },
            Pane::Autosuggest => self.handle_autosuggest_key(key),
            Pane::Feed => self.handle_feed_key(key),
            Pane::Results => self.handle_results_key(key),
            Pane::Seasons => self.handle_seasons_key(key),
            Pane::Episodes => self.handle_episodes_key(key),
            Pane::Sources => self.handle_sources_key(key),
        }
    }

    fn handle_autosuggest_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.search.panel_list.selected == 0 {
                    self.pane = Pane::Search;
                    self.input_mode = InputMode::Editing;
                } else {
                    self.search.panel_list.up();
                }
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.search.panel_list.down();
                None
            }
            KeyCode::Enter => self
                .search
                .selected_suggestion()
                .map(|item| view::autosuggest_row(item).target),
            _ => None,
        }
    }

    fn handle_feed_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.feed.list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.feed.list.down();
                None
            }
            KeyCode::Home => {
                self.feed.list.first();
                None
            }
            KeyCode::End => {
                self.feed.list.last();
                None
            }
            KeyCode::Enter => self
                .feed
                .selected_item()
                .map(|item| view::suggestion_card(item).target),
            _ => None,
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.search.results_list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.search.results_list.down();
                None
            }
            KeyCode::Home => {
                self.search.results_list.first();
                None
            }
            KeyCode::End => {
                self.search.results_list.last();
                None
            }
            KeyCode::Enter => self
                .search
                .selected_result()
                .map(|item| view::result_tile(item).target),
            _ => None,
        }
    }

    fn handle_seasons_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.picker.season_list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.picker.season_list.down();
                None
            }
            KeyCode::Enter => {
                let option = view::season_option(self.picker.selected_season()?)?;
                self.pane = Pane::Episodes;
                Some(option.target)
            }
            _ => None,
        }
    }

    fn handle_episodes_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.picker.episode_list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.picker.episode_list.down();
                None
            }
            KeyCode::Enter => self
                .picker
                .selected_episode()
                .map(|episode| view::episode_option(episode).target),
            _ => None,
        }
    }

    fn handle_sources_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                self.sources.list.up();
                None
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
                self.sources.list.down();
                None
            }
            KeyCode::Enter => {
                let index = self.sources.list.selected;
                let source = self.sources.sources.get(index)?;
                Some(view::source_button(index, source, &self.player).target)
            }
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
