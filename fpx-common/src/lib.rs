//! # FPX Common Library
//!
//! Core of the forum post explorer:
//! - Record store (CSV dataset loaded once)
//! - Tag list decoding
//! - Aggregate views (per day, per label, label shares, per author)
//! - Label / author selection
//! - Classification rule table (reference only)
//! - Session context and configuration

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod rules;
pub mod session;
pub mod store;
pub mod tags;

pub use error::{Error, Result};
pub use model::Post;
pub use rules::{RuleTable, CATCH_ALL_LABEL};
pub use session::Session;
pub use store::RecordStore;
