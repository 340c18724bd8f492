//! Chart data
//!
//! Each endpoint returns one precomputed aggregate view of the session,
//! shaped for a bar or pie chart.

use axum::{extract::State, Json};
use fpx_common::aggregate::{AuthorCount, DayCount, LabelCount, LabelShare};
use fpx_common::CATCH_ALL_LABEL;
use serde::Serialize;

use crate::AppState;

/// Chart series with a title for display
#[derive(Debug, Serialize)]
pub struct ChartResponse<T> {
    pub chart: String,
    pub title: String,
    pub series: Vec<T>,
}

/// Proportion chart, with the label left out of it
#[derive(Debug, Serialize)]
pub struct ProportionResponse {
    pub chart: String,
    pub title: String,
    pub excluded_label: String,
    pub series: Vec<LabelShare>,
}

/// Author chart, with the threshold authors had to exceed
#[derive(Debug, Serialize)]
pub struct AuthorChartResponse {
    pub chart: String,
    pub title: String,
    pub min_posts_exclusive: usize,
    pub series: Vec<AuthorCount>,
}

/// GET /api/charts/posts-per-day
pub async fn posts_per_day(State(state): State<AppState>) -> Json<ChartResponse<DayCount>> {
    Json(ChartResponse {
        chart: "posts-per-day".to_string(),
        title: "Nombre de posts par jour".to_string(),
        series: state.session.posts_per_day().to_vec(),
    })
}

/// GET /api/charts/posts-per-label
///
/// Posts with several labels are counted once per label.
pub async fn posts_per_label(State(state): State<AppState>) -> Json<ChartResponse<LabelCount>> {
    Json(ChartResponse {
        chart: "posts-per-label".to_string(),
        title: "Nombre de posts par label".to_string(),
        series: state.session.posts_per_label().to_vec(),
    })
}

/// GET /api/charts/label-proportions
pub async fn label_proportions(State(state): State<AppState>) -> Json<ProportionResponse> {
    Json(ProportionResponse {
        chart: "label-proportions".to_string(),
        title: format!("Proportion des labels SANS '{}'", CATCH_ALL_LABEL),
        excluded_label: CATCH_ALL_LABEL.to_string(),
        series: state.session.label_proportions().to_vec(),
    })
}

/// GET /api/charts/posts-per-author
pub async fn posts_per_author(State(state): State<AppState>) -> Json<AuthorChartResponse> {
    let threshold = state.session.author_min_posts();
    Json(AuthorChartResponse {
        chart: "posts-per-author".to_string(),
        title: format!("Nombre de posts par utilisateur (plus de {})", threshold),
        min_posts_exclusive: threshold,
        series: state.session.posts_per_author().to_vec(),
    })
}
