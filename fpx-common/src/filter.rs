//! Row selection by label or author
//!
//! Selections are sorted newest first. The sort is stable, so posts from the
//! same day keep their dataset order. No match is an empty result, never an
//! error.

use std::collections::HashSet;

use tracing::debug;

use crate::aggregate::{most_frequent_author, posts_per_label};
use crate::model::Post;
use crate::rules::{RuleTable, CATCH_ALL_LABEL};

fn newest_first(mut posts: Vec<&Post>) -> Vec<&Post> {
    posts.sort_by(|a, b| b.day.cmp(&a.day));
    posts
}

/// Posts tagged with `label`
///
/// Only labels from the rule table are selectable; anything else selects
/// nothing.
pub fn posts_by_label<'a>(posts: &'a [Post], rules: &RuleTable, label: &str) -> Vec<&'a Post> {
    if !rules.contains(label) {
        debug!(label, "Label not in rule table, empty selection");
        return Vec::new();
    }
    newest_first(posts.iter().filter(|p| p.has_tag(label)).collect())
}

/// Posts written by exactly `pseudo`
pub fn posts_by_author<'a>(posts: &'a [Post], pseudo: &str) -> Vec<&'a Post> {
    if pseudo.is_empty() {
        return Vec::new();
    }
    newest_first(posts.iter().filter(|p| p.pseudo == pseudo).collect())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Distinct selectable labels in first-appearance order
///
/// Labels without a rule are left out, since [`posts_by_label`] would
/// select nothing for them.
pub fn label_options(posts: &[Post], rules: &RuleTable) -> Vec<String> {
    distinct(
        posts
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .filter(|label| rules.contains(*label)),
    )
}

/// Distinct authors in first-appearance order
pub fn author_options(posts: &[Post]) -> Vec<String> {
    distinct(posts.iter().map(|p| p.pseudo.as_str()))
}

/// Initial label selection: the catch-all when present, else the most used
/// selectable label
pub fn default_label(posts: &[Post], rules: &RuleTable) -> Option<String> {
    if posts.iter().any(|p| p.has_tag(CATCH_ALL_LABEL)) {
        return Some(CATCH_ALL_LABEL.to_string());
    }
    posts_per_label(posts)
        .into_iter()
        .map(|c| c.label)
        .find(|label| rules.contains(label.as_str()))
}

/// Initial author selection: the most prolific author
pub fn default_author(posts: &[Post]) -> Option<String> {
    most_frequent_author(posts).map(str::to_string)
}
