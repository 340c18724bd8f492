//! Data exploration by label and by author
//!
//! Selections are recomputed on every request against the shared session
//! and returned newest first, 100 rows per page. A selection that matches
//! nothing is a normal response with `total_results: 0`.

use axum::{
    extract::{Query, State},
    Json,
};
use fpx_common::model::format_day;
use fpx_common::Post;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;

/// Columns of every post table, in display order
pub const POST_COLUMNS: [&str; 4] = ["comment", "tags", "pseudo", "day"];

/// Query parameters for the raw data view
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

/// Query parameters for label exploration
#[derive(Debug, Deserialize)]
pub struct LabelQuery {
    /// Exact label, as listed by /api/labels
    pub label: String,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

/// Query parameters for author exploration
#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    /// Exact pseudo, as listed by /api/authors
    pub pseudo: String,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Paginated post table
#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub selection: String,
    pub query: String,
    pub total_results: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Values for a select control
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub options: Vec<String>,
    pub default: Option<String>,
}

fn post_row(post: &Post) -> Vec<Value> {
    vec![
        json!(post.comment),
        json!(post.tags),
        json!(post.pseudo),
        json!(format_day(post.day)),
    ]
}

fn posts_page(selection: &str, query: String, posts: &[&Post], page: i64) -> PostsResponse {
    let p = calculate_pagination(posts.len(), page);

    PostsResponse {
        selection: selection.to_string(),
        query,
        total_results: posts.len(),
        page: p.page,
        page_size: PAGE_SIZE,
        total_pages: p.total_pages,
        columns: POST_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: p.slice(posts).iter().map(|post| post_row(post)).collect(),
    }
}

/// GET /api/posts?page=N
///
/// The whole dataset in file order.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<PostsResponse> {
    let all: Vec<&Post> = state.session.posts().iter().collect();
    Json(posts_page("all", String::new(), &all, query.page))
}

/// GET /api/labels
pub async fn label_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        options: state.session.label_options().to_vec(),
        default: state.session.default_label().map(str::to_string),
    })
}

/// GET /api/authors
pub async fn author_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        options: state.session.author_options().to_vec(),
        default: state.session.default_author().map(str::to_string),
    })
}

/// GET /api/explore/by-label?label=Bots&page=1
///
/// Posts carrying the label, newest first. Labels outside the rule table
/// select nothing.
pub async fn explore_by_label(
    State(state): State<AppState>,
    Query(query): Query<LabelQuery>,
) -> Json<PostsResponse> {
    let selected = state.session.posts_by_label(&query.label);
    debug!(label = %query.label, matches = selected.len(), "Label selection");
    Json(posts_page("by-label", query.label.clone(), &selected, query.page))
}

/// GET /api/explore/by-author?pseudo=name&page=1
///
/// Posts by exactly this author, newest first.
pub async fn explore_by_author(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> Json<PostsResponse> {
    let selected = state.session.posts_by_author(&query.pseudo);
    debug!(pseudo = %query.pseudo, matches = selected.len(), "Author selection");
    Json(posts_page("by-author", query.pseudo.clone(), &selected, query.page))
}
