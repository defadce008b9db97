//! Application state shared by all views
//!
//! `AppState` is created once by [`AppState::init`], lent to the views by
//! `&mut`, and torn down with [`AppState::shutdown`]. It performs no I/O
//! besides favorites persistence: every method that needs the network
//! returns a ticket and request for the caller to dispatch.

use std::time::{Duration, Instant};

use tracing::info;

use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::error::ApiError;
use crate::favorites::{FavoritesStorage, FavoritesStore, Toggled};
use crate::models::{Category, Movie};
use crate::pager::{Applied, FetchTicket, ResultPager};
use crate::query::{CatalogRequest, Filter};

pub type FetchPlan = (FetchTicket, CatalogRequest);

#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    search_input: String,
    search: Debouncer<String>,
    filter: Filter,
    // A category was cleared by typing but no fetch has reflected that yet
    filter_dirty: bool,
    pager: ResultPager,
    favorites: FavoritesStore,
}

impl AppState {
    pub fn init(config: AppConfig, storage: Box<dyn FavoritesStorage>) -> Self {
        let favorites = FavoritesStore::load(storage);
        let search = Debouncer::new(String::new(), config.debounce());
        Self {
            config,
            search_input: String::new(),
            search,
            filter: Filter::None,
            filter_dirty: false,
            pager: ResultPager::new(),
            favorites,
        }
    }

    /// Refetch page one of the current filter (session start, settings change)
    pub fn refresh(&mut self) -> FetchPlan {
        self.pager.begin_fresh(self.filter.clone())
    }

    /// Swap in edited settings. The new debounce period applies from the
    /// next keystroke.
    pub fn set_config(&mut self, config: AppConfig) {
        self.search.set_quiet(config.debounce());
        self.config = config;
    }

    pub fn shutdown(&mut self) {
        info!("Shutting down with {} favorites", self.favorites.len());
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Raw search box edit. Clears any selected category right away; the
    /// fetch waits for the debounce.
    pub fn set_search_input(&mut self, text: String, now: Instant) {
        if self.filter.category().is_some() {
            self.filter = Filter::None;
            self.filter_dirty = true;
        }
        self.search.input(text.clone(), now);
        self.search_input = text;
    }

    /// Skip the remaining quiet period (Enter key)
    pub fn submit_search(&mut self) -> Option<FetchPlan> {
        match self.search.flush() {
            Some(term) => Some(self.apply_term(term)),
            None => self.refresh_if_dirty(),
        }
    }

    /// Select a category, or deselect it when it is already active.
    /// Clears the search box without triggering a search.
    pub fn select_category(&mut self, category: Category) -> FetchPlan {
        self.filter = if self.filter.category() == Some(category) {
            Filter::None
        } else {
            Filter::from_category(category)
        };
        self.search_input.clear();
        self.search.reset(String::new());
        self.filter_dirty = false;
        self.pager.begin_fresh(self.filter.clone())
    }

    /// Called every frame. Returns a fetch once the search box has settled.
    pub fn tick(&mut self, now: Instant) -> Option<FetchPlan> {
        if let Some(term) = self.search.poll(now) {
            return Some(self.apply_term(term));
        }
        if self.search.is_pending() {
            return None;
        }
        self.refresh_if_dirty()
    }

    /// How long the frame loop may sleep before `tick` has work
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.search.remaining(now)
    }

    pub fn load_more(&mut self) -> Option<FetchPlan> {
        self.pager.load_more()
    }

    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Vec<Movie>, ApiError>) -> Applied {
        self.pager.apply(ticket, result)
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn active_category(&self) -> Option<Category> {
        self.filter.category()
    }

    pub fn results(&self) -> &[Movie] {
        self.pager.items()
    }

    pub fn pager(&self) -> &ResultPager {
        &self.pager
    }

    pub fn is_loading(&self) -> bool {
        self.pager.is_loading()
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorites.is_favorite(id)
    }

    pub fn toggle_favorite(&mut self, movie: &Movie) -> Toggled {
        self.favorites.toggle(movie)
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
    }

    fn apply_term(&mut self, term: String) -> FetchPlan {
        self.filter = Filter::from_term(&term);
        self.filter_dirty = false;
        self.pager.begin_fresh(self.filter.clone())
    }

    fn refresh_if_dirty(&mut self) -> Option<FetchPlan> {
        if !self.filter_dirty {
            return None;
        }
        self.filter_dirty = false;
        Some(self.pager.begin_fresh(self.filter.clone()))
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
