//! State of the letters list view.
//!
//! Everything the list controller owns lives on this struct and dies with
//! the component: the filter state, the response cache, the request
//! sequencers, and the persisted preferences loaded at construction.
//! There are no module-level singletons.

use std::collections::HashSet;

use common::listing::cache::ResponseCache;
use common::listing::filter::FilterState;
use common::listing::sequence::RequestSequencer;
use common::model::letter::{Letter, Pagination};
use common::model::saved_view::{SavedView, ViewMode};
use common::model::user::User;
use common::requests::LettersResponse;
use yew::NodeRef;

use super::helpers;

/// Debounce window for the main list fetch after a search keystroke.
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Debounce window for the lightweight suggestion fetch.
pub const SUGGEST_DEBOUNCE_MS: u32 = 250;

/// How many recent searches are kept in local storage.
pub const RECENT_SEARCHES_MAX: usize = 8;

/// Options for one load cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Show the loading indicator while the fetch is in flight.
    pub show_loading: bool,
    /// Bypass and clear the cache; the source of truth may have changed.
    pub force: bool,
    /// Refresh the content without touching the browser URL (used when
    /// the URL is already right, e.g. after history navigation).
    pub content_only: bool,
}

pub struct LettersComponent {
    pub filters: FilterState,
    pub view_mode: ViewMode,

    pub letters: Vec<Letter>,
    pub pagination: Option<Pagination>,
    pub users: Vec<User>,
    pub loading: bool,

    /// Response cache keyed by the canonical query string.
    pub cache: ResponseCache<LettersResponse>,
    /// Sequencer for the main list fetch stream.
    pub load_seq: RequestSequencer,
    /// Epoch tokens for the 300 ms search debounce.
    pub search_debounce: RequestSequencer,
    /// Epoch tokens for the 250 ms suggestion debounce.
    pub suggest_debounce: RequestSequencer,
    /// Sequencer for the suggestion fetch stream (independent of the main
    /// list stream).
    pub suggest_seq: RequestSequencer,
    pub suggestions: Vec<String>,

    pub saved_views: Vec<SavedView>,
    pub recent_searches: Vec<String>,

    pub selected: HashSet<String>,
    pub show_import: bool,
    pub import_sheet_ref: NodeRef,

    /// Keeps the visibilitychange/popstate callbacks alive for the
    /// component's lifetime; detached on destroy.
    pub window_listeners: helpers::WindowListeners,
    /// First-render guard.
    pub loaded: bool,
}

impl LettersComponent {
    /// Builds the initial state: filters from the current URL, page size
    /// and view mode from local storage (the URL wins when it specifies a
    /// limit), saved views and recent searches from local storage.
    pub fn new() -> Self {
        let query = helpers::current_query();
        let mut filters = FilterState::from_query_string(&query);
        if !query.contains("limit=") {
            if let Some(limit) = helpers::load_page_size() {
                filters.limit = limit;
            }
        }

        Self {
            filters,
            view_mode: helpers::load_view_mode().unwrap_or_default(),
            letters: Vec::new(),
            pagination: None,
            users: Vec::new(),
            loading: false,
            cache: ResponseCache::with_default_ttl(),
            load_seq: RequestSequencer::new(),
            search_debounce: RequestSequencer::new(),
            suggest_debounce: RequestSequencer::new(),
            suggest_seq: RequestSequencer::new(),
            suggestions: Vec::new(),
            saved_views: helpers::load_saved_views(),
            recent_searches: helpers::load_recent_searches(),
            selected: HashSet::new(),
            show_import: false,
            import_sheet_ref: NodeRef::default(),
            window_listeners: helpers::WindowListeners::default(),
            loaded: false,
        }
    }
}
