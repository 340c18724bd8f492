//! Integration tests for session initialization and dataset-wide properties
//!
//! Builds a CSV fixture on disk, loads it through `Session::init` and checks
//! the invariants every view and selection must hold for every label and
//! author in the data.

use fpx_common::config::{DecodePolicy, SessionConfig};
use fpx_common::tags::{decode_tags, encode_tags, TagsField};
use fpx_common::{Error, RuleTable, Session, CATCH_ALL_LABEL};
use std::io::Write;

const LABELS: [&str; 5] = [
    "Bots",
    "Autre",
    "rework songes",
    "manque d'Identité de classe",
    "Debug / performance",
];

/// Deterministic fixture: 40 posts over 6 days, 7 authors, 0 to 3 labels each
fn fixture_csv() -> String {
    let mut csv = String::from("comment,pseudo,day,tags\n");
    for i in 0..40usize {
        let pseudo = format!("user{}", i % 7);
        let day = format!("2025-05-{:02}", 1 + (i * 5) % 6);
        let count = i % 4;
        let tags: Vec<String> = (0..count)
            .map(|k| LABELS[(i + k * 2) % LABELS.len()].to_string())
            .collect();
        let encoded = encode_tags(&tags).replace('"', "\"\"");
        csv.push_str(&format!("\"post {}, with comma\",{},{},\"{}\"\n", i, pseudo, day, encoded));
    }
    csv
}

fn write_fixture(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write fixture");
    file
}

fn load_fixture() -> Session {
    let file = write_fixture(&fixture_csv());
    Session::init(&SessionConfig::new(file.path())).expect("Fixture should load")
}

#[test]
fn test_tags_decode_idempotent_for_every_post() {
    let session = load_fixture();
    for post in session.posts() {
        let reencoded = encode_tags(&post.tags);
        assert_eq!(decode_tags(&reencoded).unwrap(), post.tags);
        assert_eq!(TagsField::Decoded(post.tags.clone()).decode().unwrap(), post.tags);
    }
}

#[test]
fn test_label_totals_at_least_post_count() {
    let session = load_fixture();
    let total: usize = session.posts_per_label().iter().map(|c| c.count).sum();
    let labeled_rows: usize = session.posts().iter().map(|p| p.tags.len()).sum();
    assert_eq!(total, labeled_rows);

    let every_post_single = session.posts().iter().all(|p| p.tags.len() == 1);
    assert_eq!(total == session.posts().len(), every_post_single);
}

#[test]
fn test_proportions_exclude_catch_all_and_sum_to_hundred() {
    let session = load_fixture();
    let shares = session.label_proportions();
    assert!(!shares.is_empty());
    assert!(shares.iter().all(|s| s.label != CATCH_ALL_LABEL));

    let sum: f64 = shares.iter().map(|s| s.proportion).sum();
    assert!((sum - 100.0).abs() <= 0.1 + 1e-9, "sum was {}", sum);
}

#[test]
fn test_proportions_of_singleton_labels_sum_to_hundred() {
    let labels = [
        "Bots",
        "rework songes",
        "manque d'Identité de classe",
        "Debug / performance",
        "compensations",
        "drops des dofus",
    ];
    let mut csv = String::from("comment,pseudo,day,tags\n");
    for (i, label) in labels.iter().enumerate() {
        let encoded = encode_tags(&[label.to_string()]).replace('"', "\"\"");
        csv.push_str(&format!("post {},user{},2025-05-0{},\"{}\"\n", i, i, 1 + i, encoded));
    }
    let file = write_fixture(&csv);
    let session = Session::init(&SessionConfig::new(file.path())).expect("Fixture should load");

    let shares = session.label_proportions();
    assert_eq!(shares.len(), 6);
    let sum: f64 = shares.iter().map(|s| s.proportion).sum();
    assert!((sum - 100.0).abs() <= 0.1 + 1e-9, "sum was {}", sum);
    assert!(shares
        .iter()
        .all(|s| (s.proportion - 100.0 / 6.0).abs() <= 0.1 + 1e-9));
}

#[test]
fn test_posts_per_label_descending() {
    let session = load_fixture();
    let counts: Vec<usize> = session.posts_per_label().iter().map(|c| c.count).collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_posts_per_day_ascending_and_complete() {
    let session = load_fixture();
    let days = session.posts_per_day();
    assert!(days.windows(2).all(|w| w[0].day < w[1].day));
    let total: usize = days.iter().map(|d| d.count).sum();
    assert_eq!(total, session.posts().len());
}

#[test]
fn test_every_label_selection_is_sorted_subset() {
    let session = load_fixture();
    for label in session.label_options() {
        let selected = session.posts_by_label(label);
        let expected = session.posts().iter().filter(|p| p.tags.contains(label)).count();
        assert_eq!(selected.len(), expected, "label {}", label);
        assert!(selected.iter().all(|p| p.tags.contains(label)));
        assert!(selected.windows(2).all(|w| w[0].day >= w[1].day));
    }
}

#[test]
fn test_every_author_selection_is_exact() {
    let session = load_fixture();
    for pseudo in session.author_options() {
        let selected = session.posts_by_author(pseudo);
        assert!(!selected.is_empty());
        assert!(selected.iter().all(|p| &p.pseudo == pseudo));
        assert!(selected.windows(2).all(|w| w[0].day >= w[1].day));
    }
    assert!(session.posts_by_author("").is_empty());
}

#[test]
fn test_author_view_respects_threshold() {
    let session = load_fixture();
    assert!(session
        .posts_per_author()
        .iter()
        .all(|a| a.count > session.author_min_posts()));
    // 40 posts over 7 authors: everyone has 5 or 6
    assert_eq!(session.posts_per_author().len(), 7);
}

#[test]
fn test_fixture_labels_are_in_rule_table() {
    let session = load_fixture();
    let rules = RuleTable::builtin();
    assert!(session.store().unknown_labels(rules).is_empty());
    assert_eq!(session.default_label(), Some(CATCH_ALL_LABEL));
}

#[test]
fn test_malformed_tags_strict_and_skip() {
    let content = "comment,pseudo,day,tags\nok,A,2025-01-01,['Bots']\nbad,B,2025-01-02,\"eval('x')\"\n";
    let file = write_fixture(content);

    let strict = SessionConfig::new(file.path());
    assert!(matches!(Session::init(&strict), Err(Error::Decode { row: 2, .. })));

    let skip = SessionConfig {
        decode_policy: DecodePolicy::Skip,
        ..SessionConfig::new(file.path())
    };
    let session = Session::init(&skip).expect("Skip policy should load");
    assert_eq!(session.posts().len(), 1);
    assert_eq!(session.store().skipped_rows(), 1);
}
