//! Turns fetched GitHub data into page markup.

pub mod activity;
pub mod html;
pub mod icons;
pub mod repos;
pub mod stats;

pub use activity::{render_activity_feed, select_events, ActivityItem, ACTIVITY_LIMIT};
pub use repos::{rank_repositories, render_top_repositories, TOP_REPOSITORIES};
pub use stats::Stats;
