//! Update function for the letters list component.
//!
//! Elm-style: receives the current state, the context, and a message,
//! mutates state, returns whether to re-render.
//!
//! The load cycle follows a strict discipline. Every fetch belongs to a
//! stream with its own `RequestSequencer`; a completion whose token is no
//! longer current is dropped without touching state, so the displayed
//! list always reflects the most recently initiated load. The cache is
//! only ever invalidated wholesale: force loads, tab refocus, and
//! history navigation all clear the whole map.

use common::listing::filter::FilterState;
use common::model::saved_view::SavedView;
use common::requests::{BulkActionRequest, PatchLetterRequest};
use gloo_timers::future::TimeoutFuture;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::toast::show_toast;
use crate::top_sheet::{close_top_sheet, open_top_sheet};

use super::helpers;
use super::messages::Msg;
use super::state::{
    LettersComponent, LoadOptions, SEARCH_DEBOUNCE_MS, SUGGEST_DEBOUNCE_MS,
};

pub fn update(component: &mut LettersComponent, ctx: &Context<LettersComponent>, msg: Msg) -> bool {
    match msg {
        Msg::SearchInput(text) => {
            component.filters.set_search(text);

            // Coalesce keystrokes: only the newest debounce token fires a
            // load, and the suggestion stream debounces independently.
            let token = component.search_debounce.issue();
            let link = ctx.link().clone();
            spawn_local(async move {
                TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
                link.send_message(Msg::SearchDebounced(token));
            });

            let suggest_token = component.suggest_debounce.issue();
            let link = ctx.link().clone();
            spawn_local(async move {
                TimeoutFuture::new(SUGGEST_DEBOUNCE_MS).await;
                link.send_message(Msg::SuggestDebounced(suggest_token));
            });
            true
        }
        Msg::SearchDebounced(token) => {
            if !component.search_debounce.is_current(token) {
                return false;
            }
            helpers::remember_search(&mut component.recent_searches, &component.filters.search);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
            false
        }
        Msg::SuggestDebounced(token) => {
            if !component.suggest_debounce.is_current(token) {
                return false;
            }
            let query = component.filters.search.trim().to_string();
            if query.is_empty() {
                component.suggestions.clear();
                component.suggest_seq.invalidate_all();
                return true;
            }
            let fetch_token = component.suggest_seq.issue();
            let link = ctx.link().clone();
            spawn_local(async move {
                let suggestions = helpers::fetch_suggestions(&query).await.unwrap_or_default();
                link.send_message(Msg::SuggestionsLoaded(fetch_token, suggestions));
            });
            false
        }
        Msg::SuggestionsLoaded(token, suggestions) => {
            if !component.suggest_seq.is_current(token) {
                return false;
            }
            component.suggestions = suggestions;
            true
        }
        Msg::ApplySuggestion(text) => {
            component.filters.set_search(text);
            component.suggestions.clear();
            component.search_debounce.invalidate_all();
            component.suggest_debounce.invalidate_all();
            helpers::remember_search(&mut component.recent_searches, &component.filters.search);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
            true
        }

        Msg::SetStatusFilter(status) => {
            component.filters.set_status(status);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
            true
        }
        Msg::SetQuickFilter(quick) => {
            component.filters.set_quick(quick);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
            true
        }
        Msg::SetOwnerFilter(owner) => {
            component.filters.set_owner(owner);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
            true
        }
        Msg::SetTypeFilter(letter_type) => {
            component.filters.set_letter_type(letter_type);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
            true
        }
        Msg::SetPage(page) => {
            component.filters.set_page(page);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
            true
        }
        Msg::SetLimit(limit) => {
            component.filters.set_limit(limit);
            helpers::store_page_size(component.filters.limit);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
            true
        }
        Msg::ToggleSort(field) => {
            component.filters.toggle_sort(field);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
            true
        }

        Msg::Load(opts) => {
            let key = component.filters.to_query_string();

            if opts.force {
                component.cache.clear();
            } else if let Some(response) = component.cache.fresh(&key, js_sys::Date::now()) {
                // Cache hit: serve without a network call and clear any
                // stale loading indicator. Outstanding fetches for older
                // states are superseded.
                component.letters = response.letters.clone();
                component.pagination = Some(response.pagination.clone());
                component.loading = false;
                component.load_seq.invalidate_all();
                if !opts.content_only {
                    helpers::sync_url(&key);
                }
                return true;
            }

            component.loading = opts.show_loading;
            let token = component.load_seq.issue();
            if !opts.content_only {
                helpers::sync_url(&key);
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                match helpers::fetch_letters(&key).await {
                    Ok(response) => link.send_message(Msg::Loaded(token, response)),
                    Err(error) => link.send_message(Msg::LoadFailed(token, error)),
                }
            });
            true
        }
        Msg::Loaded(token, response) => {
            if !component.load_seq.is_current(token) {
                // A newer load has started since; this response is stale.
                return false;
            }
            component.loading = false;
            let key = component.filters.to_query_string();
            component
                .cache
                .insert(key, response.clone(), js_sys::Date::now());
            component.letters = response.letters;
            component.pagination = Some(response.pagination);
            true
        }
        Msg::LoadFailed(token, error) => {
            if !component.load_seq.is_current(token) {
                return false;
            }
            // Keep the previous list; just tell the user.
            component.loading = false;
            gloo_console::warn!("letters load failed:", error.clone());
            show_toast(&format!("Failed to load letters: {}", error));
            true
        }

        Msg::VisibilityRegained => {
            // The source of truth may have changed while the tab was
            // hidden.
            component.cache.clear();
            ctx.link()
                .send_message(Msg::Load(LoadOptions::default()));
            false
        }
        Msg::HistoryNavigated => {
            component.cache.clear();
            let query = helpers::current_query();
            component.filters = FilterState::from_query_string(&query);
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                content_only: true,
                ..LoadOptions::default()
            }));
            true
        }

        Msg::SetViewMode(mode) => {
            component.view_mode = mode;
            helpers::store_view_mode(mode);
            true
        }
        Msg::SaveCurrentView => {
            let name = web_sys::window()
                .and_then(|w| w.prompt_with_message("Name for this view:").ok())
                .flatten()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty());
            if let Some(name) = name {
                component.saved_views.push(SavedView {
                    id: uuid::Uuid::new_v4().to_string(),
                    name,
                    filters: component.filters.clone(),
                    view_mode: component.view_mode,
                });
                helpers::store_saved_views(&component.saved_views);
                return true;
            }
            false
        }
        Msg::ApplyView(id) => {
            if let Some(view) = component.saved_views.iter().find(|v| v.id == id).cloned() {
                component.filters = view.filters;
                component.filters.set_page(1);
                component.view_mode = view.view_mode;
                helpers::store_view_mode(view.view_mode);
                ctx.link().send_message(Msg::Load(LoadOptions {
                    show_loading: true,
                    ..LoadOptions::default()
                }));
                return true;
            }
            false
        }
        Msg::DeleteView(id) => {
            component.saved_views.retain(|v| v.id != id);
            helpers::store_saved_views(&component.saved_views);
            true
        }

        Msg::UsersLoaded(users) => {
            component.users = users;
            true
        }
        Msg::ToggleSelect(id) => {
            if !component.selected.remove(&id) {
                component.selected.insert(id);
            }
            true
        }
        Msg::ToggleSelectAll => {
            if component.selected.len() == component.letters.len() {
                component.selected.clear();
            } else {
                component.selected = component.letters.iter().map(|l| l.id.clone()).collect();
            }
            true
        }

        Msg::PatchField { id, field, value } => {
            let link = ctx.link().clone();
            spawn_local(async move {
                let request = PatchLetterRequest {
                    field: field.to_string(),
                    value,
                };
                match helpers::patch_letter(&id, &request).await {
                    Ok(letter) => link.send_message(Msg::Patched(letter)),
                    Err(error) => link.send_message(Msg::ActionFailed(error)),
                }
            });
            false
        }
        Msg::Patched(letter) => {
            // Optimistic in-place refresh of the edited row, then a
            // forced reload to resync ordering and pagination.
            if let Some(slot) = component.letters.iter_mut().find(|l| l.id == letter.id) {
                *slot = letter;
            }
            ctx.link().send_message(Msg::Load(LoadOptions {
                force: true,
                ..LoadOptions::default()
            }));
            true
        }
        Msg::ActionFailed(error) => {
            show_toast(&error);
            true
        }

        Msg::RunBulkAction(action, value) => {
            if component.selected.is_empty() {
                show_toast("No letters selected");
                return false;
            }
            let request = BulkActionRequest {
                ids: component.selected.iter().cloned().collect(),
                action,
                value,
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match helpers::post_bulk_action(&request).await {
                    Ok(affected) => link.send_message(Msg::BulkActionDone(affected)),
                    Err(error) => link.send_message(Msg::ActionFailed(error)),
                }
            });
            false
        }
        Msg::BulkActionDone(affected) => {
            show_toast(&format!("{} letters updated", affected));
            component.selected.clear();
            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                force: true,
                ..LoadOptions::default()
            }));
            true
        }

        Msg::OpenImport => {
            component.show_import = true;
            open_top_sheet(component.import_sheet_ref.clone());
            true
        }
        Msg::ImportCreated => {
            ctx.link().send_message(Msg::Load(LoadOptions {
                force: true,
                ..LoadOptions::default()
            }));
            false
        }
        Msg::ImportClosed => {
            component.show_import = false;
            close_top_sheet(component.import_sheet_ref.clone());
            true
        }
    }
}
