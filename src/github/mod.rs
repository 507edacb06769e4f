pub mod client;
pub mod error;
pub mod responses;

pub use client::{fetch_all, GhClient, GitHubApi, GitHubData};
pub use error::Error;
