//! Application state and event handling.
//!
//! The terminal loop owns an [`App`] and feeds it key events, timer ticks
//! and fetch outcomes. Fetches run on spawned tasks and report back over
//! an unbounded channel, so the drawing loop never blocks on the network.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{Character, CharacterClient, CharactersPage, StatusFilter};
use crate::config::Config;
use crate::feed::{CharacterFeed, FeedPhase, PageRequest};
use crate::i18n::{Language, UiStrings};
use crate::suggest;
use crate::view::{self, SortKey};

/// Which part of the screen receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Status,
    Species,
    Sort,
    Table,
}

impl Focus {
    pub fn next(self) -> Focus {
        match self {
            Focus::Status => Focus::Species,
            Focus::Species => Focus::Sort,
            Focus::Sort => Focus::Table,
            Focus::Table => Focus::Status,
        }
    }

    pub fn prev(self) -> Focus {
        match self {
            Focus::Status => Focus::Table,
            Focus::Species => Focus::Status,
            Focus::Sort => Focus::Species,
            Focus::Table => Focus::Sort,
        }
    }
}

/// Result of one spawned fetch, echoing back the request ticket so the
/// feed can tell fresh results from stale ones.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded {
        request: PageRequest,
        page: CharactersPage,
    },
    Failed {
        request: PageRequest,
        message: String,
    },
}

/// Everything the UI shows and the key handler mutates.
pub struct App {
    config: Config,
    client: CharacterClient,
    outcomes_tx: mpsc::UnboundedSender<FetchOutcome>,
    /// The sentinel triggers a fetch only on the hidden-to-visible edge;
    /// this remembers which side of the edge the last frame was on.
    sentinel_was_visible: bool,

    pub feed: CharacterFeed,
    pub language: Language,
    pub focus: Focus,
    pub sort: SortKey,
    pub species_input: String,
    pub suggestions: Vec<&'static str>,
    pub suggestion_cursor: Option<usize>,
    /// Index of the first table row on screen.
    pub scroll: usize,
    /// Table rows that fit on screen. Updated by the renderer every frame.
    pub viewport_rows: usize,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl App {
    /// Build the app plus the receiving end of its fetch-outcome channel.
    /// The caller owns the receiver and pumps it from the event loop.
    pub fn new(config: Config) -> Result<(App, mpsc::UnboundedReceiver<FetchOutcome>)> {
        let client = CharacterClient::new(&config)?;
        let language = Language::from_code(&config.language)?;
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        let app = App {
            config,
            client,
            outcomes_tx,
            sentinel_was_visible: false,
            feed: CharacterFeed::new(),
            language,
            focus: Focus::Status,
            sort: SortKey::default(),
            species_input: String::new(),
            suggestions: Vec::new(),
            suggestion_cursor: None,
            scroll: 0,
            viewport_rows: 0,
            spinner_frame: 0,
            should_quit: false,
        };

        Ok((app, outcomes_rx))
    }

    /// Kick off the first page for the default filter. Must run inside a
    /// tokio runtime.
    pub fn start(&mut self) {
        let request = self.feed.reset_pagination();
        self.spawn_fetch(request, false);
    }

    /// String table for the active language.
    pub fn strings(&self) -> &'static UiStrings {
        self.language.strings()
    }

    /// Rows in display order, sorted per the current sort key.
    pub fn sorted_rows(&self) -> Vec<Character> {
        view::sorted_characters(self.feed.characters(), self.sort)
    }

    /// Run one fetch on its own task. Load-more fetches wait out the
    /// configured delay first so the spinner row is actually seen.
    fn spawn_fetch(&self, request: PageRequest, delayed: bool) {
        let client = self.client.clone();
        let tx = self.outcomes_tx.clone();
        let delay = Duration::from_millis(self.config.load_more_delay_ms);

        tokio::spawn(async move {
            if delayed && delay > Duration::ZERO {
                tokio::time::sleep(delay).await;
            }

            let outcome = match client.fetch_page(request.page, &request.filter).await {
                Ok(page) => FetchOutcome::Loaded { request, page },
                Err(error) => FetchOutcome::Failed {
                    request,
                    message: error.to_string(),
                },
            };

            // A closed channel means the app is shutting down.
            let _ = tx.send(outcome);
        });
    }

    /// Fold a finished fetch back into the feed.
    pub fn on_fetch_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Loaded { request, page } => {
                if self.feed.apply_page(&request, page) {
                    // Re-arm the sentinel: if it is still on screen after
                    // the new rows render, the next check fetches again.
                    self.sentinel_was_visible = false;
                    self.scroll = self.scroll.min(self.max_scroll());
                }
            }
            FetchOutcome::Failed { request, message } => {
                self.feed.apply_error(&request, &message);
            }
        }
    }

    /// Fetch the next page when the sentinel row just scrolled into view.
    /// Call once per frame, after the renderer has set `viewport_rows`.
    pub fn check_sentinel(&mut self) {
        let visible = self.sentinel_visible();
        if visible && !self.sentinel_was_visible {
            if let Some(request) = self.feed.next_page_request() {
                debug!(page = request.page, "sentinel visible, fetching next page");
                self.spawn_fetch(request, true);
            }
        }
        self.sentinel_was_visible = visible;
    }

    /// The sentinel is the virtual row right after the last character. It
    /// counts as visible only when the whole row is inside the viewport.
    fn sentinel_visible(&self) -> bool {
        if self.viewport_rows == 0 {
            return false;
        }
        let sentinel = self.feed.characters().len();
        sentinel >= self.scroll && sentinel < self.scroll + self.viewport_rows
    }

    fn max_scroll(&self) -> usize {
        // The sentinel row occupies one slot after the characters.
        (self.feed.characters().len() + 1).saturating_sub(self.viewport_rows)
    }

    /// Advance animations. Driven by the event-loop ticker.
    pub fn on_tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Crossterm reports both presses and releases on some platforms.
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Ctrl+C quits from anywhere, including the error screen.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.feed.phase() == FeedPhase::Error {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::F(2) => self.set_language(Language::ENGLISH),
            KeyCode::F(3) => self.set_language(Language::GERMAN),
            KeyCode::Tab => {
                self.dismiss_suggestions();
                self.focus = self.focus.next();
            }
            KeyCode::BackTab => {
                self.dismiss_suggestions();
                self.focus = self.focus.prev();
            }
            _ => match self.focus {
                Focus::Status => self.on_status_key(key.code),
                Focus::Species => self.on_species_key(key.code),
                Focus::Sort => self.on_sort_key(key.code),
                Focus::Table => self.on_table_key(key.code),
            },
        }
    }

    fn set_language(&mut self, language: Language) {
        if self.language != language {
            self.language = language;
            debug!(code = language.code(), "language switched");
        }
    }

    fn on_status_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Up => self.commit_status(self.feed.filter().status.prev()),
            KeyCode::Right | KeyCode::Down => self.commit_status(self.feed.filter().status.next()),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Status commits as soon as the value changes, like a dropdown.
    fn commit_status(&mut self, status: StatusFilter) {
        if let Some(request) = self.feed.set_status(status) {
            self.reset_viewport();
            self.spawn_fetch(request, false);
        }
    }

    fn on_species_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.species_input.push(c);
                self.refresh_suggestions();
            }
            KeyCode::Backspace => {
                self.species_input.pop();
                self.refresh_suggestions();
            }
            KeyCode::Down => self.move_suggestion_cursor(1),
            KeyCode::Up => self.move_suggestion_cursor(-1),
            KeyCode::Esc => self.dismiss_suggestions(),
            KeyCode::Enter => self.commit_species(),
            _ => {}
        }
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = suggest::species_suggestions(&self.species_input);
        self.suggestion_cursor = None;
    }

    fn move_suggestion_cursor(&mut self, delta: isize) {
        if self.suggestions.is_empty() {
            return;
        }
        let len = self.suggestions.len() as isize;
        let current = self.suggestion_cursor.map_or(-1, |i| i as isize);
        self.suggestion_cursor = Some((current + delta).rem_euclid(len) as usize);
    }

    fn dismiss_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestion_cursor = None;
    }

    /// Species commits on Enter only. A highlighted suggestion wins over
    /// whatever was typed; otherwise the raw input is the filter.
    fn commit_species(&mut self) {
        if let Some(word) = self
            .suggestion_cursor
            .and_then(|index| self.suggestions.get(index).copied())
        {
            self.species_input = word.to_string();
        }
        self.dismiss_suggestions();

        let species = self.species_input.clone();
        if let Some(request) = self.feed.set_species(&species) {
            self.reset_viewport();
            self.spawn_fetch(request, false);
        }
    }

    /// Sorting is presentation-only. No fetch, no pagination reset.
    fn on_sort_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Up => self.sort = self.sort.prev(),
            KeyCode::Right | KeyCode::Down => self.sort = self.sort.next(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_table_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = (self.scroll + 1).min(self.max_scroll()),
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.viewport_rows.max(1));
            }
            KeyCode::PageDown => {
                self.scroll = (self.scroll + self.viewport_rows.max(1)).min(self.max_scroll());
            }
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.max_scroll(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn reset_viewport(&mut self) {
        self.scroll = 0;
        self.sentinel_was_visible = false;
    }
}
