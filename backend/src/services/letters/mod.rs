//! # Letters Service Module
//!
//! Aggregates the API endpoints for the letters collection under
//! `/api/letters`.
//!
//! ## Sub-modules:
//! - `list`: filtered/sorted/paginated listing.
//! - `suggest`: bounded search suggestions for the list view's
//!   suggestion stream.
//! - `patch`: single-field inline updates.
//! - `bulk`: transactional batch creation with duplicate handling.
//! - `actions`: bulk delete / set-status / set-owner on a selection.

pub mod actions;
pub mod bulk;
pub mod list;
pub mod patch;
pub mod suggest;

use actix_web::web::{get, patch, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/letters";

/// Configures and returns the Actix `Scope` for all letters routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/suggest", get().to(suggest::process))
        .route("/bulk", post().to(bulk::process))
        .route("/actions", post().to(actions::process))
        .route("/{letter_id}", patch().to(patch::process))
        .route("", get().to(list::process))
}
