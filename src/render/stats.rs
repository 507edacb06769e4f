use crate::{document::ids, github::responses::UserProfile};

/// Profile counters shown in the statistics bar.
#[derive(PartialEq, Eq, Copy, Clone, Default, Debug)]
pub struct Stats {
    pub repositories: u64,
    pub followers: u64,
    pub following: u64,
    pub gists: u64,
}

impl Stats {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            repositories: profile.public_repos.unwrap_or_default(),
            followers: profile.followers.unwrap_or_default(),
            following: profile.following.unwrap_or_default(),
            gists: profile.public_gists.unwrap_or_default(),
        }
    }

    /// Pairs of element id and the text that goes into it.
    pub fn slots(&self) -> [(&'static str, String); 4] {
        [
            (ids::STAT_REPOS, self.repositories.to_string()),
            (ids::STAT_FOLLOWERS, self.followers.to_string()),
            (ids::STAT_FOLLOWING, self.following.to_string()),
            (ids::STAT_GISTS, self.gists.to_string()),
        ]
    }
}
