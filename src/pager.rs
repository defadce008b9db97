//! Result list paging and reconciliation
//!
//! The pager never performs I/O. It hands out a [`FetchTicket`] for every
//! request the caller should send and folds the outcome back in with
//! [`ResultPager::apply`].

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::Movie;
use crate::query::{CatalogRequest, Filter};

/// Identifies an in-flight list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub page: u32,
}

impl FetchTicket {
    pub fn is_load_more(&self) -> bool {
        self.page > 1
    }
}

/// What applying a response did to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Replaced(usize),
    Appended(usize),
    Cleared,
    Ignored,
    Stale,
}

#[derive(Debug, Default)]
pub struct ResultPager {
    filter: Filter,
    page: u32,
    generation: u64,
    items: Vec<Movie>,
    loading: bool,
}

impl ResultPager {
    pub fn new() -> Self {
        Self { page: 1, ..Default::default() }
    }

    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fresh query: page back to 1, list cleared, loading set.
    pub fn begin_fresh(&mut self, filter: Filter) -> (FetchTicket, CatalogRequest) {
        self.generation += 1;
        self.filter = filter;
        self.page = 1;
        self.items.clear();
        self.loading = true;
        debug!(generation = self.generation, filter = %self.filter.describe(), "fresh fetch");
        let ticket = FetchTicket { generation: self.generation, page: 1 };
        (ticket, CatalogRequest::for_filter(&self.filter, 1))
    }

    /// Advance to the next page. Refused while a fresh fetch is loading or
    /// the list is empty. Leaves the loading flag untouched.
    pub fn load_more(&mut self) -> Option<(FetchTicket, CatalogRequest)> {
        if self.loading || self.items.is_empty() {
            return None;
        }
        self.page += 1;
        debug!(generation = self.generation, page = self.page, "load more");
        let ticket = FetchTicket { generation: self.generation, page: self.page };
        Some((ticket, CatalogRequest::for_filter(&self.filter, self.page)))
    }

    /// Reconcile a response. Responses are applied in arrival order; only
    /// those belonging to an older generation are dropped.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Vec<Movie>, ApiError>) -> Applied {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                current = self.generation,
                page = ticket.page,
                "dropping stale response"
            );
            return Applied::Stale;
        }

        if !ticket.is_load_more() {
            self.loading = false;
            return match result {
                Ok(movies) => {
                    self.items.clear();
                    Applied::Replaced(append_unique(&mut self.items, movies))
                }
                Err(err) => {
                    warn!(filter = %self.filter.describe(), "fetch failed: {}", err);
                    self.items.clear();
                    Applied::Cleared
                }
            };
        }

        match result {
            Ok(movies) => Applied::Appended(append_unique(&mut self.items, movies)),
            Err(err) => {
                warn!(page = ticket.page, "load more failed: {}", err);
                Applied::Ignored
            }
        }
    }
}

/// Append `incoming` to `items`, skipping any id already in the list or
/// earlier in the same page. The first occurrence wins. Returns how many
/// were added.
pub fn append_unique(items: &mut Vec<Movie>, incoming: Vec<Movie>) -> usize {
    let mut present: HashSet<i64> = items.iter().map(|m| m.id).collect();
    let before = items.len();
    items.extend(incoming.into_iter().filter(|m| present.insert(m.id)));
    items.len() - before
}

#[cfg(test)]
#[path = "pager_tests.rs"]
mod tests;
