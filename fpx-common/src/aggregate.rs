//! Aggregate views
//!
//! Every function derives a fresh table from a slice of posts. Label views
//! work on the exploded tag column: a post with k labels contributes k rows,
//! so label totals can exceed the number of posts.
//!
//! Ties in count-ordered views keep the order in which keys first appear in
//! the dataset.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::model::{format_day, Post};

/// Headline metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_posts: usize,
    pub unique_users: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// `YYYY-MM-DD`
    pub day: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// A label's share of all non-excluded label rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelShare {
    pub label: String,
    /// Percentage, rounded to one decimal
    pub proportion: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub pseudo: String,
    pub count: usize,
}

pub fn overview(posts: &[Post]) -> Overview {
    let authors: HashSet<&str> = posts.iter().map(|p| p.pseudo.as_str()).collect();
    Overview {
        total_posts: posts.len(),
        unique_users: authors.len(),
    }
}

/// Posts per day, ascending by day
pub fn posts_per_day(posts: &[Post]) -> Vec<DayCount> {
    let mut counts = BTreeMap::new();
    for post in posts {
        *counts.entry(post.day).or_insert(0usize) += 1;
    }
    counts
        .into_iter()
        .map(|(day, count)| DayCount {
            day: format_day(day),
            count,
        })
        .collect()
}

/// One item per (post, label) pair
pub fn explode(posts: &[Post]) -> impl Iterator<Item = &str> {
    posts.iter().flat_map(|p| p.tags.iter().map(String::as_str))
}

/// Occurrence counts, descending, ties in first-appearance order
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match index.get(value).copied() {
            Some(i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    // Stable: equal counts keep insertion order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Exploded label counts, descending
pub fn posts_per_label(posts: &[Post]) -> Vec<LabelCount> {
    value_counts(explode(posts))
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// Each label's percentage of exploded rows, leaving out `excluded`
///
/// Shares have one decimal and always sum to exactly 100.0. Returns an
/// empty view when nothing remains after exclusion.
pub fn label_proportions(posts: &[Post], excluded: &str) -> Vec<LabelShare> {
    let counts = value_counts(explode(posts).filter(|label| *label != excluded));
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }

    let values: Vec<usize> = counts.iter().map(|(_, count)| *count).collect();
    let tenths = apportion_tenths(&values, total);

    counts
        .into_iter()
        .zip(tenths)
        .map(|((label, count), tenths)| LabelShare {
            label: label.to_string(),
            proportion: tenths as f64 / 10.0,
            count,
        })
        .collect()
}

/// Authors with strictly more than `min_exclusive` posts, descending
pub fn posts_per_author(posts: &[Post], min_exclusive: usize) -> Vec<AuthorCount> {
    value_counts(posts.iter().map(|p| p.pseudo.as_str()))
        .into_iter()
        .filter(|(_, count)| *count > min_exclusive)
        .map(|(pseudo, count)| AuthorCount {
            pseudo: pseudo.to_string(),
            count,
        })
        .collect()
}

/// Most frequent author, first appearance on ties
pub fn most_frequent_author(posts: &[Post]) -> Option<&str> {
    value_counts(posts.iter().map(|p| p.pseudo.as_str()))
        .first()
        .map(|(pseudo, _)| *pseudo)
}

/// Split 1000 tenths of a percent across `counts` (largest remainder)
///
/// Each entry is `count * 1000 / total` rounded down, then the tenths left
/// over go to the largest remainders, earlier entries first on ties. Every
/// entry stays within one tenth of its exact share and the entries sum to
/// 1000. `total` must be the sum of `counts`.
pub fn apportion_tenths(counts: &[usize], total: usize) -> Vec<u64> {
    if total == 0 {
        return vec![0; counts.len()];
    }

    let scaled: Vec<(u64, u64)> = counts
        .iter()
        .map(|&count| {
            let numerator = count as u64 * 1000;
            (numerator / total as u64, numerator % total as u64)
        })
        .collect();

    let mut tenths: Vec<u64> = scaled.iter().map(|(floor, _)| *floor).collect();
    let leftover = 1000u64.saturating_sub(tenths.iter().sum());

    let mut order: Vec<usize> = (0..scaled.len()).collect();
    order.sort_by(|&a, &b| scaled[b].1.cmp(&scaled[a].1));
    for &i in order.iter().take(leftover as usize) {
        tenths[i] += 1;
    }
    tenths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::CATCH_ALL_LABEL;
    use chrono::NaiveDate;

    fn post(tags: &[&str], pseudo: &str, day: (i32, u32, u32)) -> Post {
        Post {
            comment: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            pseudo: pseudo.to_string(),
            day: NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap(),
        }
    }

    /// P1 {Bots, A, 01-01}, P2 {Bots+Autre, B, 01-02}, P3 {no label, A, 01-03}
    fn scenario() -> Vec<Post> {
        vec![
            post(&["Bots"], "A", (2025, 1, 1)),
            post(&["Bots", "Autre"], "B", (2025, 1, 2)),
            post(&[], "A", (2025, 1, 3)),
        ]
    }

    #[test]
    fn test_scenario_posts_per_label() {
        let counts = posts_per_label(&scenario());
        assert_eq!(
            counts,
            vec![
                LabelCount { label: "Bots".to_string(), count: 2 },
                LabelCount { label: "Autre".to_string(), count: 1 },
            ]
        );
        assert_eq!(explode(&scenario()).count(), 3);
    }

    #[test]
    fn test_scenario_label_proportions() {
        let shares = label_proportions(&scenario(), CATCH_ALL_LABEL);
        assert_eq!(
            shares,
            vec![LabelShare { label: "Bots".to_string(), proportion: 100.0, count: 2 }]
        );
    }

    #[test]
    fn test_overview_counts_distinct_authors() {
        assert_eq!(
            overview(&scenario()),
            Overview { total_posts: 3, unique_users: 2 }
        );
        assert_eq!(overview(&[]), Overview { total_posts: 0, unique_users: 0 });
    }

    #[test]
    fn test_posts_per_day_ascending() {
        let posts = vec![
            post(&[], "A", (2025, 5, 3)),
            post(&[], "B", (2025, 5, 1)),
            post(&[], "C", (2025, 5, 3)),
        ];
        assert_eq!(
            posts_per_day(&posts),
            vec![
                DayCount { day: "2025-05-01".to_string(), count: 1 },
                DayCount { day: "2025-05-03".to_string(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_label_total_at_least_post_count() {
        let posts = vec![
            post(&["Bots"], "A", (2025, 1, 1)),
            post(&["Bots", "rework songes"], "B", (2025, 1, 1)),
            post(&["Autre"], "C", (2025, 1, 2)),
        ];
        let total: usize = posts_per_label(&posts).iter().map(|c| c.count).sum();
        assert!(total > posts.len());
    }

    #[test]
    fn test_label_total_equals_post_count_with_single_labels() {
        let posts = vec![
            post(&["Bots"], "A", (2025, 1, 1)),
            post(&["rework songes"], "B", (2025, 1, 1)),
            post(&["Bots"], "C", (2025, 1, 2)),
        ];
        let total: usize = posts_per_label(&posts).iter().map(|c| c.count).sum();
        assert_eq!(total, posts.len());
    }

    #[test]
    fn test_label_ties_keep_first_appearance() {
        let posts = vec![
            post(&["b"], "A", (2025, 1, 1)),
            post(&["a", "c"], "A", (2025, 1, 1)),
            post(&["c"], "A", (2025, 1, 1)),
        ];
        let labels: Vec<String> = posts_per_label(&posts).into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_proportions_sum_to_hundred() {
        let posts = vec![
            post(&["a"], "A", (2025, 1, 1)),
            post(&["b", "Autre"], "A", (2025, 1, 1)),
            post(&["c"], "A", (2025, 1, 1)),
        ];
        let shares = label_proportions(&posts, CATCH_ALL_LABEL);
        let values: Vec<f64> = shares.iter().map(|s| s.proportion).collect();
        assert_eq!(values, vec![33.4, 33.3, 33.3]);
        let sum: f64 = values.iter().sum();
        assert!((sum - 100.0).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn test_proportions_six_singleton_labels_sum_to_hundred() {
        let labels = ["a", "b", "c", "d", "e", "f"];
        let posts: Vec<Post> = labels
            .iter()
            .map(|label| post(&[*label], "A", (2025, 1, 1)))
            .collect();

        let shares = label_proportions(&posts, CATCH_ALL_LABEL);
        let values: Vec<f64> = shares.iter().map(|s| s.proportion).collect();
        assert_eq!(values, vec![16.7, 16.7, 16.7, 16.7, 16.6, 16.6]);

        let sum: f64 = values.iter().sum();
        assert!((sum - 100.0).abs() <= 0.1 + 1e-9, "sum was {}", sum);
        for share in &shares {
            let exact = 100.0 / 6.0;
            assert!((share.proportion - exact).abs() <= 0.1 + 1e-9);
        }
    }

    #[test]
    fn test_proportions_empty_when_only_catch_all() {
        let posts = vec![post(&["Autre"], "A", (2025, 1, 1)), post(&[], "B", (2025, 1, 1))];
        assert!(label_proportions(&posts, CATCH_ALL_LABEL).is_empty());
        assert!(label_proportions(&[], CATCH_ALL_LABEL).is_empty());
    }

    #[test]
    fn test_posts_per_author_threshold_is_strict() {
        let mut posts = Vec::new();
        for _ in 0..3 {
            posts.push(post(&[], "three", (2025, 1, 1)));
        }
        for _ in 0..2 {
            posts.push(post(&[], "two", (2025, 1, 1)));
        }
        for _ in 0..4 {
            posts.push(post(&[], "four", (2025, 1, 1)));
        }

        let authors = posts_per_author(&posts, 2);
        assert_eq!(
            authors,
            vec![
                AuthorCount { pseudo: "four".to_string(), count: 4 },
                AuthorCount { pseudo: "three".to_string(), count: 3 },
            ]
        );
        assert!(authors.iter().all(|a| a.count > 2));
    }

    #[test]
    fn test_most_frequent_author() {
        assert_eq!(most_frequent_author(&scenario()), Some("A"));
        let tie = vec![post(&[], "X", (2025, 1, 1)), post(&[], "Y", (2025, 1, 1))];
        assert_eq!(most_frequent_author(&tie), Some("X"));
        assert_eq!(most_frequent_author(&[]), None);
    }

    #[test]
    fn test_apportion_tenths() {
        assert_eq!(apportion_tenths(&[1, 2], 3), vec![333, 667]);
        assert_eq!(apportion_tenths(&[1, 7], 8), vec![125, 875]);
        assert_eq!(apportion_tenths(&[5], 5), vec![1000]);
        assert_eq!(apportion_tenths(&[0, 0], 0), vec![0, 0]);

        // 42 singleton labels, 23.81% each
        let tenths = apportion_tenths(&[1; 42], 42);
        assert_eq!(tenths.iter().sum::<u64>(), 1000);
        assert!(tenths.iter().all(|&t| t == 23 || t == 24));
    }
}
