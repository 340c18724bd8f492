//! Session context
//!
//! One explicit initialization step turns the dataset into an immutable
//! snapshot: the record store plus every derived view. Share it behind an
//! `Arc`; nothing in it can be mutated after construction.

use tracing::{info, warn};

use crate::aggregate::{self, AuthorCount, DayCount, LabelCount, LabelShare, Overview};
use crate::config::SessionConfig;
use crate::filter;
use crate::model::Post;
use crate::rules::{RuleTable, CATCH_ALL_LABEL};
use crate::store::RecordStore;
use crate::Result;

/// Loaded dataset and its derived views
#[derive(Debug)]
pub struct Session {
    store: RecordStore,
    rules: &'static RuleTable,
    author_min_posts: usize,
    overview: Overview,
    posts_per_day: Vec<DayCount>,
    posts_per_label: Vec<LabelCount>,
    label_proportions: Vec<LabelShare>,
    posts_per_author: Vec<AuthorCount>,
    label_options: Vec<String>,
    author_options: Vec<String>,
    default_label: Option<String>,
    default_author: Option<String>,
}

impl Session {
    /// Load the dataset and derive every view
    ///
    /// Any load failure is returned as-is and should abort startup.
    pub fn init(config: &SessionConfig) -> Result<Self> {
        info!("Loading dataset from {}", config.dataset_path.display());
        let store = RecordStore::load(&config.dataset_path, config.decode_policy)?;
        Ok(Self::from_store(store, config.author_min_posts))
    }

    /// Derive views over an already-loaded store
    pub fn from_store(store: RecordStore, author_min_posts: usize) -> Self {
        let rules = RuleTable::builtin();

        let unknown = store.unknown_labels(rules);
        if !unknown.is_empty() {
            warn!(
                "{} label(s) in the dataset have no classification rule: {}",
                unknown.len(),
                unknown.join(", ")
            );
        }

        let posts = store.posts();
        let session = Self {
            overview: aggregate::overview(posts),
            posts_per_day: aggregate::posts_per_day(posts),
            posts_per_label: aggregate::posts_per_label(posts),
            label_proportions: aggregate::label_proportions(posts, CATCH_ALL_LABEL),
            posts_per_author: aggregate::posts_per_author(posts, author_min_posts),
            label_options: filter::label_options(posts, rules),
            author_options: filter::author_options(posts),
            default_label: filter::default_label(posts, rules),
            default_author: filter::default_author(posts),
            author_min_posts,
            rules,
            store,
        };

        info!(
            "Session ready: {} posts, {} authors, {} labels",
            session.overview.total_posts,
            session.overview.unique_users,
            session.label_options.len()
        );
        session
    }

    pub fn posts(&self) -> &[Post] {
        self.store.posts()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn rules(&self) -> &'static RuleTable {
        self.rules
    }

    pub fn overview(&self) -> &Overview {
        &self.overview
    }

    pub fn posts_per_day(&self) -> &[DayCount] {
        &self.posts_per_day
    }

    pub fn posts_per_label(&self) -> &[LabelCount] {
        &self.posts_per_label
    }

    pub fn label_proportions(&self) -> &[LabelShare] {
        &self.label_proportions
    }

    pub fn posts_per_author(&self) -> &[AuthorCount] {
        &self.posts_per_author
    }

    /// Threshold the author view was built with (counts must exceed it)
    pub fn author_min_posts(&self) -> usize {
        self.author_min_posts
    }

    pub fn label_options(&self) -> &[String] {
        &self.label_options
    }

    pub fn author_options(&self) -> &[String] {
        &self.author_options
    }

    pub fn default_label(&self) -> Option<&str> {
        self.default_label.as_deref()
    }

    pub fn default_author(&self) -> Option<&str> {
        self.default_author.as_deref()
    }

    pub fn posts_by_label(&self, label: &str) -> Vec<&Post> {
        filter::posts_by_label(self.store.posts(), self.rules, label)
    }

    pub fn posts_by_author(&self, pseudo: &str) -> Vec<&Post> {
        filter::posts_by_author(self.store.posts(), pseudo)
    }
}
