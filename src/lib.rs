//! Static portfolio page builder for a GitHub profile.
//!
//! Fetches a user's public profile, repositories and events, renders the
//! statistics bar, top repositories grid and activity feed into a page
//! template, and mounts the contribution calendar widget. [nav] models the
//! page's navigation bar behaviour.

pub mod app;
pub mod calendar;
pub mod config;
pub mod display;
pub mod document;
pub mod github;
pub mod nav;
pub mod render;
