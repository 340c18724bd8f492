//! fpx-dash library - forum post dashboard
//!
//! HTTP surface over an immutable [`Session`]: chart data, label and author
//! exploration, and the labeling rule reference.

use std::sync::Arc;

use axum::Router;
use fpx_common::Session;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded dataset and derived views (read-only)
    pub session: Arc<Session>,
}

impl AppState {
    /// Create new application state
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/overview", get(api::get_overview))
        .route("/api/charts/posts-per-day", get(api::posts_per_day))
        .route("/api/charts/posts-per-label", get(api::posts_per_label))
        .route("/api/charts/label-proportions", get(api::label_proportions))
        .route("/api/charts/posts-per-author", get(api::posts_per_author))
        .route("/api/posts", get(api::list_posts))
        .route("/api/labels", get(api::label_options))
        .route("/api/authors", get(api::author_options))
        .route("/api/explore/by-label", get(api::explore_by_label))
        .route("/api/explore/by-author", get(api::explore_by_author))
        .route("/api/rules", get(api::list_rules))
        .route("/api/rules/select", post(api::select_rules));

    let ui = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(ui)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
