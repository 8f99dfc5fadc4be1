//! Orchestrator - runs effects and feeds outcomes back into the app
//!
//! Every request is spawned as a tokio task and reports back over one mpsc
//! channel. Each region remembers the ticket of its latest request; outcomes
//! carrying an older ticket are dropped, so the UI always reflects the most
//! recently triggered request regardless of arrival order.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::BackendClient;
use crate::app::{Action, App, Effect, Outcome};
use crate::debounce::Debouncer;
use crate::models::Genre;
use crate::player::{request_fullscreen, LocalPlayer};

/// Independent request regions of the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Suggestions,
    Autosuggest,
    Search,
    Detail,
    Seasons,
    Episodes,
    Sources,
}

impl Outcome {
    /// Region this outcome belongs to
    pub fn region(&self) -> Region {
        match self {
            Outcome::Suggestions { .. } => Region::Suggestions,
            Outcome::Autosuggest { .. } => Region::Autosuggest,
            Outcome::Search { .. } => Region::Search,
            Outcome::Detail { .. } => Region::Detail,
            Outcome::Seasons { .. } => Region::Seasons,
            Outcome::Episodes { .. } => Region::Episodes,
            Outcome::Sources { .. } => Region::Sources,
        }
    }
}

/// Outcome tagged with the ticket of the request that produced it
#[derive(Debug)]
pub struct Tagged {
    pub ticket: u64,
    pub outcome: Outcome,
}

/// Latest issued ticket per region
#[derive(Debug, Default)]
pub struct Tickets {
    latest: HashMap<Region, u64>,
}

impl Tickets {
    /// Issue a new ticket, superseding every earlier one for `region`
    pub fn issue(&mut self, region: Region) -> u64 {
        let ticket = self.latest.entry(region).or_insert(0);
        *ticket += 1;
        *ticket
    }

    pub fn is_current(&self, region: Region, ticket: u64) -> bool {
        self.latest.get(&region) == Some(&ticket)
    }
}

/// Runtime knobs
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    pub debounce: Duration,
    pub start_genre: Genre,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            start_genre: Genre::Trending,
        }
    }
}

/// Owns the app state and everything that talks to the outside world
pub struct Orchestrator {
    pub app: App,
    client: BackendClient,
    player: LocalPlayer,
    debouncer: Debouncer,
    options: RuntimeOptions,
    tickets: Tickets,
    tx: UnboundedSender<Tagged>,
    rx: UnboundedReceiver<Tagged>,
}

impl Orchestrator {
    pub fn new(app: App, client: BackendClient, player: LocalPlayer, options: RuntimeOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            app,
            client,
            player,
            debouncer: Debouncer::new(),
            options,
            tickets: Tickets::default(),
            tx,
            rx,
        }
    }

    /// Load the opening suggestion tab
    pub async fn start(&mut self) {
        self.dispatch(Action::SelectGenre(self.options.start_genre))
            .await;
    }

    /// Run a user action through the app and perform its effects
    pub async fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        let effects = self.app.dispatch(action);
        self.run_effects(effects).await;
    }

    /// Wait for the next completed request
    pub async fn next_outcome(&mut self) -> Option<Tagged> {
        self.rx.recv().await
    }

    /// Apply an outcome if it is still current; returns whether it was applied
    pub async fn handle(&mut self, tagged: Tagged) -> bool {
        let region = tagged.outcome.region();
        if !self.tickets.is_current(region, tagged.ticket) {
            tracing::debug!(?region, ticket = tagged.ticket, "discarding superseded outcome");
            return false;
        }
        let effects = self.app.apply(tagged.outcome);
        self.run_effects(effects).await;
        true
    }

    /// Apply every outcome that has already arrived
    pub async fn drain(&mut self) {
        while let Ok(tagged) = self.rx.try_recv() {
            self.handle(tagged).await;
        }
    }

    /// Apply outcomes until none arrives for `quiet`
    pub async fn settle(&mut self, quiet: Duration) {
        while let Ok(Some(tagged)) = tokio::time::timeout(quiet, self.rx.recv()).await {
            self.handle(tagged).await;
        }
    }

    /// Stop the player and any pending autosuggest
    pub async fn shutdown(&mut self) {
        self.debouncer.cancel();
        self.player.stop().await;
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_effect(effect).await;
        }
    }

    async fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchSuggestions(genre) => {
                let client = self.client.clone();
                self.spawn(Region::Suggestions, async move {
                    Outcome::Suggestions {
                        genre,
                        result: client.suggestions(genre).await,
                    }
                });
            }
            Effect::ScheduleAutosuggest { query, filter } => {
                let ticket = self.tickets.issue(Region::Autosuggest);
                let client = self.client.clone();
                let tx = self.tx.clone();
                self.debouncer.schedule(self.options.debounce, async move {
                    let result = client.search(&query, filter).await;
                    let outcome = Outcome::Autosuggest { query, result };
                    let _ = tx.send(Tagged { ticket, outcome });
                });
            }
            Effect::CancelAutosuggest => {
                self.debouncer.cancel();
                // Anything already in flight is now stale
                self.tickets.issue(Region::Autosuggest);
            }
            Effect::Search { query, filter } => {
                let client = self.client.clone();
                self.spawn(Region::Search, async move {
                    let result = client.search(&query, filter).await;
                    Outcome::Search { query, result }
                });
            }
            Effect::FetchDetail { id, media_type } => {
                let client = self.client.clone();
                self.spawn(Region::Detail, async move {
                    Outcome::Detail {
                        id,
                        media_type,
                        result: client.detail(id, media_type).await,
                    }
                });
            }
            Effect::FetchSeasons { tv_id } => {
                let client = self.client.clone();
                self.spawn(Region::Seasons, async move {
                    Outcome::Seasons {
                        tv_id,
                        result: client.seasons(tv_id).await,
                    }
                });
            }
            Effect::FetchEpisodes { tv_id, season } => {
                let client = self.client.clone();
                self.spawn(Region::Episodes, async move {
                    Outcome::Episodes {
                        tv_id,
                        season,
                        result: client.episodes(tv_id, season).await,
                    }
                });
            }
            Effect::ResolveSources(request) => {
                let client = self.client.clone();
                self.spawn(Region::Sources, async move {
                    let result = client.stream(&request).await;
                    Outcome::Sources { request, result }
                });
            }
            Effect::BindPlayer { url } => {
                if let Err(e) = self.player.play(&url).await {
                    tracing::warn!(%url, error = %e, "player launch failed");
                    self.app.notice = Some(e.to_string());
                }
            }
            Effect::RequestFullscreen => {
                if request_fullscreen(&mut self.player).await.is_some() {
                    self.app.set_fullscreen(true);
                }
            }
        }
    }

    fn spawn<F>(&mut self, region: Region, request: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let ticket = self.tickets.issue(region);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = request.await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(Tagged { ticket, outcome });
        });
    }
}
