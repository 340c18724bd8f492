//! Labeling rule reference
//!
//! Read-only view of the keyword expressions used when the dataset was
//! labeled. Nothing here touches the posts.

use axum::{extract::State, Json};
use fpx_common::rules::{Rule, RuleSelection};
use serde::Serialize;

use crate::AppState;

/// Rules to display
#[derive(Debug, Serialize)]
pub struct RulesResponse {
    pub total_rules: usize,
    pub rules: Vec<Rule>,
    /// Set when the selection shows nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// GET /api/rules
///
/// Every rule, in table order.
pub async fn list_rules(State(state): State<AppState>) -> Json<RulesResponse> {
    let table = state.session.rules();
    Json(RulesResponse {
        total_rules: table.len(),
        rules: table.iter().cloned().collect(),
        hint: None,
    })
}

/// POST /api/rules/select
///
/// Body: `{"show_all": bool, "labels": [..]}`. Unknown labels are skipped.
pub async fn select_rules(
    State(state): State<AppState>,
    Json(selection): Json<RuleSelection>,
) -> Json<RulesResponse> {
    let table = state.session.rules();
    let rules: Vec<Rule> = table.select(&selection).into_iter().cloned().collect();
    let hint = rules
        .is_empty()
        .then(|| "Select label(s) or check 'Show all'.".to_string());

    Json(RulesResponse {
        total_rules: table.len(),
        rules,
        hint,
    })
}
