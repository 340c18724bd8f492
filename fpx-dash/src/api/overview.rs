//! Headline metrics

use axum::{extract::State, Json};
use fpx_common::aggregate::Overview;

use crate::AppState;

/// GET /api/overview
///
/// Total posts and distinct authors.
pub async fn get_overview(State(state): State<AppState>) -> Json<Overview> {
    Json(state.session.overview().clone())
}
