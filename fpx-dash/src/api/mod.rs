//! HTTP API handlers for fpx-dash

pub mod buildinfo;
pub mod charts;
pub mod explore;
pub mod health;
pub mod overview;
pub mod rules;
pub mod ui;

pub use buildinfo::get_build_info;
pub use charts::{label_proportions, posts_per_author, posts_per_day, posts_per_label};
pub use explore::{author_options, explore_by_author, explore_by_label, label_options, list_posts};
pub use health::health_routes;
pub use overview::get_overview;
pub use rules::{list_rules, select_rules};
pub use ui::{serve_app_js, serve_index};
