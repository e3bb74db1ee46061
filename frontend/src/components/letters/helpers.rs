//! Browser-facing plumbing for the letters list: HTTP calls, local
//! storage, URL synchronization, and window event listeners. The pure
//! state rules live in `common::listing`; this module is the only place
//! the list view touches `web_sys`.

use common::model::letter::Letter;
use common::model::saved_view::{SavedView, ViewMode};
use common::model::user::User;
use common::requests::{
    BulkActionRequest, BulkActionResponse, LettersResponse, PatchLetterRequest, SuggestResponse,
    UsersResponse,
};
use gloo_net::http::Request;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::html::Scope;

use super::messages::Msg;
use super::state::{LettersComponent, RECENT_SEARCHES_MAX};

const PAGE_SIZE_KEY: &str = "letters.pageSize";
const VIEW_MODE_KEY: &str = "letters.viewMode";
const SAVED_VIEWS_KEY: &str = "letters.savedViews";
const RECENT_SEARCHES_KEY: &str = "letters.recentSearches";

// ---- HTTP ----

async fn expect_ok(response: gloo_net::http::Response) -> Result<gloo_net::http::Response, String> {
    if response.ok() {
        Ok(response)
    } else {
        Err(response
            .text()
            .await
            .unwrap_or_else(|_| "Request failed".to_string()))
    }
}

pub async fn fetch_letters(query: &str) -> Result<LettersResponse, String> {
    let url = if query.is_empty() {
        "/api/letters".to_string()
    } else {
        format!("/api/letters?{}", query)
    };
    let response = Request::get(&url).send().await.map_err(|e| e.to_string())?;
    expect_ok(response)
        .await?
        .json::<LettersResponse>()
        .await
        .map_err(|e| e.to_string())
}

pub async fn fetch_suggestions(q: &str) -> Result<Vec<String>, String> {
    let response = Request::get("/api/letters/suggest")
        .query([("q", q)])
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response)
        .await?
        .json::<SuggestResponse>()
        .await
        .map(|r| r.suggestions)
        .map_err(|e| e.to_string())
}

pub async fn fetch_users() -> Result<Vec<User>, String> {
    let response = Request::get("/api/users")
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response)
        .await?
        .json::<UsersResponse>()
        .await
        .map(|r| r.users)
        .map_err(|e| e.to_string())
}

pub async fn patch_letter(id: &str, req: &PatchLetterRequest) -> Result<Letter, String> {
    let response = Request::patch(&format!("/api/letters/{}", id))
        .json(req)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response)
        .await?
        .json::<Letter>()
        .await
        .map_err(|e| e.to_string())
}

pub async fn post_bulk_action(req: &BulkActionRequest) -> Result<u32, String> {
    let response = Request::post("/api/letters/actions")
        .json(req)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response)
        .await?
        .json::<BulkActionResponse>()
        .await
        .map(|r| r.affected)
        .map_err(|e| e.to_string())
}

// ---- URL synchronization (state wins) ----

/// The query string of the current browser URL, without the leading `?`.
pub fn current_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|s| s.trim_start_matches('?').to_string())
        .unwrap_or_default()
}

/// Pushes the canonical query string into the address bar when it
/// differs from what is already there. State is the source of truth;
/// the URL follows.
pub fn sync_url(query: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if current_query() == query {
        return;
    }
    let Ok(history) = window.history() else {
        return;
    };
    let path = window
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_string());
    let target = if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    };
    let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&target));
}

// ---- Local persistence ----

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn load_page_size() -> Option<u32> {
    local_storage()?
        .get_item(PAGE_SIZE_KEY)
        .ok()??
        .parse()
        .ok()
}

pub fn store_page_size(limit: u32) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(PAGE_SIZE_KEY, &limit.to_string());
    }
}

pub fn load_view_mode() -> Option<ViewMode> {
    ViewMode::from_key(&local_storage()?.get_item(VIEW_MODE_KEY).ok()??)
}

pub fn store_view_mode(mode: ViewMode) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(VIEW_MODE_KEY, mode.as_key());
    }
}

pub fn load_saved_views() -> Vec<SavedView> {
    local_storage()
        .and_then(|s| s.get_item(SAVED_VIEWS_KEY).ok().flatten())
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

pub fn store_saved_views(views: &[SavedView]) {
    if let (Some(storage), Ok(json)) = (local_storage(), serde_json::to_string(views)) {
        let _ = storage.set_item(SAVED_VIEWS_KEY, &json);
    }
}

pub fn load_recent_searches() -> Vec<String> {
    local_storage()
        .and_then(|s| s.get_item(RECENT_SEARCHES_KEY).ok().flatten())
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

pub fn store_recent_searches(searches: &[String]) {
    if let (Some(storage), Ok(json)) = (local_storage(), serde_json::to_string(searches)) {
        let _ = storage.set_item(RECENT_SEARCHES_KEY, &json);
    }
}

/// Moves `term` to the front of the recent-searches list, deduplicated
/// and capped, and persists the result.
pub fn remember_search(recent: &mut Vec<String>, term: &str) {
    let term = term.trim();
    if term.is_empty() {
        return;
    }
    recent.retain(|t| t != term);
    recent.insert(0, term.to_string());
    recent.truncate(RECENT_SEARCHES_MAX);
    store_recent_searches(recent);
}

// ---- Window listeners ----

/// Window/document event listeners bound for the lifetime of the list
/// view. Each entry remembers its target so `detach` can unregister it
/// before the closure is dropped on unmount.
#[derive(Default)]
pub struct WindowListeners {
    entries: Vec<(
        web_sys::EventTarget,
        &'static str,
        Closure<dyn FnMut(web_sys::Event)>,
    )>,
}

impl WindowListeners {
    pub fn detach(&mut self) {
        for (target, event, closure) in self.entries.drain(..) {
            let _ = target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

/// Binds the visibilitychange and popstate listeners. The returned
/// holder lives on the component; `detach` runs on destroy so no
/// listener outlives the view.
pub fn bind_window_listeners(link: &Scope<LettersComponent>) -> WindowListeners {
    let mut listeners = WindowListeners::default();
    let Some(window) = web_sys::window() else {
        return listeners;
    };

    if let Some(document) = window.document() {
        let link_vis = link.clone();
        let doc = document.clone();
        let on_visibility = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if doc.visibility_state() == web_sys::VisibilityState::Visible {
                link_vis.send_message(Msg::VisibilityRegained);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            on_visibility.as_ref().unchecked_ref(),
        );
        listeners
            .entries
            .push((document.into(), "visibilitychange", on_visibility));
    }

    let link_pop = link.clone();
    let on_popstate = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        link_pop.send_message(Msg::HistoryNavigated);
    }) as Box<dyn FnMut(web_sys::Event)>);
    let _ =
        window.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
    listeners.entries.push((window.into(), "popstate", on_popstate));

    listeners
}
