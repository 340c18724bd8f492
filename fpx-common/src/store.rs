//! Record store
//!
//! The labeled dataset, read once at startup and never modified afterwards.
//! Clones share the same rows.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::StringRecord;
use tracing::{info, warn};

use crate::config::DecodePolicy;
use crate::model::{parse_day, Post};
use crate::rules::RuleTable;
use crate::tags::decode_tags;
use crate::{Error, Result};

/// Columns the dataset must provide (any order, extra columns ignored)
pub const REQUIRED_COLUMNS: [&str; 4] = ["comment", "pseudo", "day", "tags"];

/// Immutable in-memory table of posts, in file order
#[derive(Debug, Clone)]
pub struct RecordStore {
    posts: Arc<[Post]>,
    skipped_rows: usize,
}

struct ColumnIndex {
    comment: usize,
    pseudo: usize,
    day: usize,
    tags: usize,
}

impl ColumnIndex {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Load(format!(
                "Dataset is missing required column(s): {}",
                missing.join(", ")
            )));
        }

        // All present, checked above
        Ok(Self {
            comment: position("comment").unwrap_or_default(),
            pseudo: position("pseudo").unwrap_or_default(),
            day: position("day").unwrap_or_default(),
            tags: position("tags").unwrap_or_default(),
        })
    }
}

impl RecordStore {
    /// Load the dataset from a CSV file
    ///
    /// A missing file, missing columns, ragged rows or unparseable dates are
    /// fatal. Malformed `tags` cells follow `policy`.
    pub fn load(path: &Path, policy: DecodePolicy) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Load(format!("Dataset not found: {}", path.display())));
        }

        let file = std::fs::File::open(path)?;
        let store = Self::from_reader(file, policy)?;

        info!(
            "Loaded {} posts from {} ({} rows skipped)",
            store.len(),
            path.display(),
            store.skipped_rows
        );
        Ok(store)
    }

    /// Read CSV content from any reader
    pub fn from_reader<R: Read>(reader: R, policy: DecodePolicy) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndex::locate(&headers)?;

        let mut posts = Vec::new();
        let mut skipped_rows = 0;

        for (i, record) in csv_reader.records().enumerate() {
            let row = i + 1;
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or("");

            let raw_day = field(columns.day);
            let day = parse_day(raw_day)
                .ok_or_else(|| Error::Load(format!("Invalid day at row {}: {:?}", row, raw_day)))?;

            let tags = match decode_tags(field(columns.tags)) {
                Ok(tags) => tags,
                Err(source) => match policy {
                    DecodePolicy::Strict => return Err(Error::Decode { row, source }),
                    DecodePolicy::Skip => {
                        warn!(row, error = %source, "Skipping row with malformed tags");
                        skipped_rows += 1;
                        continue;
                    }
                },
            };

            posts.push(Post {
                comment: field(columns.comment).to_string(),
                tags,
                pseudo: field(columns.pseudo).to_string(),
                day,
            });
        }

        if skipped_rows > 0 {
            warn!("{} rows skipped because of malformed tags", skipped_rows);
        }

        Ok(Self {
            posts: posts.into(),
            skipped_rows,
        })
    }

    /// Build a store from rows already in memory
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: posts.into(),
            skipped_rows: 0,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Rows dropped under [`DecodePolicy::Skip`]
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Labels present in the data but absent from the rule table, in order
    /// of first appearance
    pub fn unknown_labels(&self, rules: &RuleTable) -> Vec<String> {
        let mut seen = HashSet::new();
        self.posts
            .iter()
            .flat_map(|p| p.tags.iter())
            .filter(|label| !rules.contains(label.as_str()))
            .filter(|label| seen.insert(label.as_str()))
            .cloned()
            .collect()
    }
}
