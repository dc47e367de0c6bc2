//! Search: debounced symbol search over a one-shot rate fetch.
//!
//! Queries pass through a debounce before a search starts, and a settled
//! query equal to the last one searched is skipped until `clear()`. Starting a search aborts the previous one, and a
//! generation counter keeps a search that is still unwinding from
//! publishing over its successor.

use futures::StreamExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::services::Services;
use super::state::{
    run_pipeline, BottomBar, Epoch, JobSlot, Publish, ScreenJob, ScreenState, StateCell,
};
use crate::error::AppResult;
use crate::models::{FavoriteRecord, Rate};
use crate::stream::{combine_latest, debounce};

/// Matches of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub rates: Vec<Rate>,
    pub favorites: Vec<FavoriteRecord>,
}

impl SearchResults {
    pub fn is_favorite(&self, rate: &Rate) -> bool {
        rate.is_favorite_in(&self.favorites)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    /// No query yet (or the query was cleared).
    Start,
    Results(ScreenState<SearchResults>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchUiState {
    /// The text as typed, updated immediately.
    pub query: String,
    pub phase: SearchPhase,
}

impl Default for SearchUiState {
    fn default() -> Self {
        Self {
            query: String::new(),
            phase: SearchPhase::Start,
        }
    }
}

/// Rates whose symbol contains `query`, ignoring case.
pub fn filter_by_symbol(rates: &[Rate], query: &str) -> Vec<Rate> {
    let needle = query.to_lowercase();
    rates
        .iter()
        .filter(|rate| rate.symbol.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

enum Command {
    /// Re-run the current query now.
    Retry,
    /// Stop the running search.
    Cancel,
}

pub struct SearchScreen {
    services: Services,
    state: StateCell<SearchUiState>,
    queries: mpsc::UnboundedSender<String>,
    commands: mpsc::UnboundedSender<Command>,
    bottom_bar: BottomBar,
    searches: Arc<AtomicUsize>,
    driver: JobSlot,
}

impl SearchScreen {
    /// Open the screen. Hides the bottom bar.
    pub fn open(services: Services, bottom_bar: BottomBar) -> Self {
        bottom_bar.hide();

        let (queries, queries_rx) = mpsc::unbounded_channel();
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let screen = Self {
            services,
            state: StateCell::new(SearchUiState::default()),
            queries,
            commands,
            bottom_bar,
            searches: Arc::new(AtomicUsize::new(0)),
            driver: JobSlot::new(),
        };

        let driver = Driver {
            services: screen.services.clone(),
            state: screen.state.clone(),
            searches: screen.searches.clone(),
            generation: Epoch::new(),
            search: ScreenJob::idle(),
        };
        screen.driver.restart(driver.run(
            queries_rx,
            commands_rx,
            screen.services.timing.search_debounce,
        ));
        screen
    }

    /// The user typed. The text is echoed into the state at once; the search
    /// itself waits for the debounce.
    pub fn on_query_change(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.update(|state| state.query = query.clone());
        if self.queries.send(query).is_err() {
            tracing::debug!("search: driver stopped, query dropped");
        }
    }

    /// Re-run the current query immediately.
    pub fn retry(&self) {
        tracing::info!("search: retry requested");
        if self.commands.send(Command::Retry).is_err() {
            tracing::debug!("search: driver stopped, retry dropped");
        }
    }

    /// Reset to the start state.
    pub fn clear(&self) {
        self.state.set(SearchUiState::default());
        if self.commands.send(Command::Cancel).is_err() {
            tracing::debug!("search: driver stopped, clear dropped");
            return;
        }
        // Replaces any query still waiting out the debounce
        if self.queries.send(String::new()).is_err() {
            tracing::debug!("search: driver stopped, query dropped");
        }
    }

    pub async fn toggle_favorite(&self, rate: &Rate) -> AppResult<bool> {
        self.services
            .favorites
            .toggle_favorite(rate)
            .await
            .inspect_err(|e| tracing::error!("search: toggling {} failed: {}", rate.id, e))
    }

    /// Leave the screen: stop searching and show the bottom bar again.
    pub fn navigate_back(&self) {
        self.driver.cancel();
        self.bottom_bar.show();
    }

    /// Number of searches started so far.
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> watch::Receiver<SearchUiState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SearchUiState {
        self.state.get()
    }
}

struct Driver {
    services: Services,
    state: StateCell<SearchUiState>,
    searches: Arc<AtomicUsize>,
    generation: Epoch,
    search: ScreenJob,
}

impl Driver {
    async fn run(
        mut self,
        queries: mpsc::UnboundedReceiver<String>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        period: Duration,
    ) {
        let mut queries = debounce(UnboundedReceiverStream::new(queries), period).boxed();
        let mut current = String::new();
        // Last settled query; None after a cancel so retyping it searches again
        let mut last: Option<String> = None;

        loop {
            tokio::select! {
                query = queries.next() => match query {
                    Some(query) if last.as_deref() == Some(query.as_str()) => {
                        tracing::trace!("search: '{}' unchanged", query);
                    }
                    Some(query) => {
                        last = Some(query.clone());
                        current = query;
                        self.start(&current);
                    }
                    None => break,
                },
                Some(command) = commands.recv() => match command {
                    Command::Retry => self.start(&current),
                    Command::Cancel => {
                        self.search.cancel();
                        self.generation.advance();
                        last = None;
                        current.clear();
                    }
                },
            }
        }
        tracing::debug!("search: driver stopped");
    }

    fn start(&mut self, query: &str) {
        self.search.cancel();
        let ticket = self.generation.advance();

        if query.is_empty() {
            self.state.update(|state| state.phase = SearchPhase::Start);
            return;
        }

        self.searches.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("search: running '{}'", query);

        let publish: Publish<SearchResults> = {
            let state = self.state.clone();
            let generation = self.generation.clone();
            Arc::new(move |results| {
                state.update_if(
                    || generation.is_current(ticket),
                    |state| state.phase = SearchPhase::Results(results),
                );
            })
        };

        let rates = self.services.rates.clone();
        let favorites = self.services.favorites.clone();
        let query = query.to_string();
        let factory = move || {
            let query = query.clone();
            combine_latest(
                rates.rates(),
                favorites.favorite_records(),
                move |rates: &Vec<Rate>, records: &Vec<FavoriteRecord>| SearchResults {
                    query: query.clone(),
                    rates: filter_by_symbol(rates, &query),
                    favorites: records.clone(),
                },
            )
        };

        self.search.restart(run_pipeline(
            "search",
            factory,
            self.services.retry.clone(),
            |results: SearchResults| {
                if results.rates.is_empty() {
                    ScreenState::Empty
                } else {
                    ScreenState::Loaded(results)
                }
            },
            publish,
        ));
    }
}
