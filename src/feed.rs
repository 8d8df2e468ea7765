use tracing::{debug, warn};

use crate::api::{Character, CharacterFilter, CharactersPage, StatusFilter};

/// What the screen as a whole is doing. Derived from feed state, never
/// stored, so it cannot drift out of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// First page of the current filter is being fetched. Nothing to show.
    LoadingFirstPage,
    /// First page failed. Terminal for this filter; only quitting works.
    Error,
    /// At least one page is on screen and no request is running.
    Ready,
    /// At least one page is on screen and a follow-up page is in flight.
    LoadingMore,
}

/// A request ticket handed to the fetch task and returned with its outcome.
/// `generation` identifies which filter epoch the request belongs to;
/// results from an older epoch are dropped on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub generation: u64,
    pub filter: CharacterFilter,
}

/// Pagination state for one filter epoch: the committed filter, the rows
/// accumulated so far, and the bookkeeping that gates further fetches.
///
/// At most one request is in flight at a time. Changing the filter starts
/// a new generation; anything still in flight for the old one is ignored
/// when it lands.
#[derive(Debug)]
pub struct CharacterFeed {
    filter: CharacterFilter,
    characters: Vec<Character>,
    /// Highest page applied so far. 0 means no page has landed yet.
    page: u32,
    generation: u64,
    in_flight: bool,
    has_next: bool,
    fatal_error: Option<String>,
    last_error: Option<String>,
}

impl Default for CharacterFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterFeed {
    pub fn new() -> Self {
        Self {
            filter: CharacterFilter::default(),
            characters: Vec::new(),
            page: 0,
            generation: 0,
            in_flight: false,
            has_next: true,
            fatal_error: None,
            last_error: None,
        }
    }

    pub fn filter(&self) -> &CharacterFilter {
        &self.filter
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn fatal_error(&self) -> Option<&str> {
        self.fatal_error.as_deref()
    }

    pub fn phase(&self) -> FeedPhase {
        if self.fatal_error.is_some() {
            FeedPhase::Error
        } else if self.page == 0 {
            FeedPhase::LoadingFirstPage
        } else if self.in_flight {
            FeedPhase::LoadingMore
        } else {
            FeedPhase::Ready
        }
    }

    /// Commit a new status constraint. Returns the first-page request for
    /// the new filter, or `None` if the value did not change.
    pub fn set_status(&mut self, status: StatusFilter) -> Option<PageRequest> {
        if self.filter.status == status {
            return None;
        }
        self.filter.status = status;
        Some(self.reset_pagination())
    }

    /// Commit a new species constraint. Returns the first-page request for
    /// the new filter, or `None` if the value did not change.
    pub fn set_species(&mut self, species: &str) -> Option<PageRequest> {
        if self.filter.species == species {
            return None;
        }
        self.filter.species = species.to_string();
        Some(self.reset_pagination())
    }

    /// Drop everything accumulated for the old filter and start a new
    /// generation at page 1. The returned request is already marked
    /// in flight.
    pub fn reset_pagination(&mut self) -> PageRequest {
        self.generation += 1;
        self.characters.clear();
        self.page = 0;
        self.has_next = true;
        self.in_flight = true;
        self.fatal_error = None;
        self.last_error = None;

        debug!(
            generation = self.generation,
            status = self.filter.status.query_value(),
            species = %self.filter.species,
            "filter changed, restarting at page 1"
        );

        PageRequest {
            page: 1,
            generation: self.generation,
            filter: self.filter.clone(),
        }
    }

    /// Ask for the next page, if one exists and nothing is already running.
    /// The returned request is already marked in flight.
    pub fn next_page_request(&mut self) -> Option<PageRequest> {
        if self.in_flight || !self.has_next || self.fatal_error.is_some() {
            return None;
        }
        self.in_flight = true;
        Some(PageRequest {
            page: self.page + 1,
            generation: self.generation,
            filter: self.filter.clone(),
        })
    }

    /// Apply a fetched page. Returns `false` when the request belongs to a
    /// superseded generation and was dropped.
    pub fn apply_page(&mut self, request: &PageRequest, page: CharactersPage) -> bool {
        if request.generation != self.generation {
            debug!(
                request_generation = request.generation,
                current_generation = self.generation,
                page = request.page,
                "dropping stale page from a superseded filter"
            );
            return false;
        }

        self.in_flight = false;
        self.last_error = None;
        self.has_next = page.info.next.is_some();
        self.page = request.page;

        debug!(
            page = request.page,
            added = page.results.len(),
            total = self.characters.len() + page.results.len(),
            has_next = self.has_next,
            "page applied"
        );

        self.characters.extend(page.results);
        true
    }

    /// Record a failed fetch. A first-page failure is fatal for this
    /// filter; a load-more failure keeps the rows already on screen and
    /// only surfaces a message. Returns `false` when the request was stale.
    pub fn apply_error(&mut self, request: &PageRequest, message: &str) -> bool {
        if request.generation != self.generation {
            debug!(
                request_generation = request.generation,
                current_generation = self.generation,
                "dropping stale error from a superseded filter"
            );
            return false;
        }

        self.in_flight = false;
        warn!(page = request.page, error = message, "page fetch failed");

        if request.page == 1 {
            self.fatal_error = Some(message.to_string());
        } else {
            self.last_error = Some(message.to_string());
        }
        true
    }
}
