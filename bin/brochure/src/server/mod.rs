//! HTTP server: auth, admin pages, blob-backed resources and the signaling
//! relay, with the built site served as the fallback.

pub mod admin;
pub mod auth;
pub mod error;
pub mod leads;
pub mod pages;
pub mod signaling;
pub mod state;
pub mod store;

use std::path::Path;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

pub use self::{
    error::ApiError,
    state::AppState,
    store::{BlobStore, FsBlobStore, MemoryBlobStore},
};

/// Create the application router.
pub fn create_router(state: AppState, site_dir: &Path) -> Router {
    Router::new()
        .route("/api/auth", post(auth::login))
        .route("/api/logout", get(auth::logout).post(auth::logout))
        .route("/admin", get(admin::panel))
        .route("/admin/leads", get(admin::leads_table))
        .route(
            "/api/pages",
            get(pages::get)
                .put(pages::save)
                .post(pages::save)
                .delete(pages::delete),
        )
        .route(
            "/api/leads",
            get(leads::list).put(leads::save).delete(leads::delete),
        )
        .route(
            "/api/signaling",
            get(signaling::fetch)
                .post(signaling::store)
                .fallback(signaling::unsupported),
        )
        .fallback_service(ServeDir::new(site_dir))
        .with_state(state)
}
