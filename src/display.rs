use crate::github::responses::{RepositorySummary, UserProfile};
use chrono::{DateTime, TimeZone, Utc};
use std::{borrow::Cow, fmt};
use unicode_segmentation::UnicodeSegmentation;

macro_rules! write_col {
    ($w:expr, $len:expr, $txt:expr) => {
        write!($w, "{:len$}", ellipsize($txt, $len as _), len = $len as _)
    };
    (, $w:expr, $len:expr, $txt:expr) => {
        write!($w, " | {:len$}", ellipsize($txt, $len as _), len = $len as _)
    };
}

const REPO_NAME_LEN: u8 = 24;
const REPO_DESC_LEN: u8 = 40;
const LANG_NAME_LEN: u8 = 10;
const COUNT_LEN: u8 = 5;
const PUSHED_AT_LEN: u8 = 14;

pub fn ellipsize(text: &str, threshold: usize) -> Cow<'_, str> {
    debug_assert!(threshold > 3);
    if text.graphemes(true).count() <= threshold {
        text.into()
    } else {
        let text: String = text
            .graphemes(true)
            .map(|c| if c == "\n" { " " } else { c })
            .take(threshold - 3)
            .collect();
        let text: String = text.trim_end().chars().chain("...".chars()).collect();
        text.into()
    }
}

#[cfg(test)]
#[test]
fn test_ellipsize() {
    use quickcheck::{quickcheck, TestResult};

    fn has_max_length_threshold(text: String, threshold: usize) -> TestResult {
        if threshold < 4 {
            return TestResult::discard();
        }
        TestResult::from_bool(ellipsize(&text, threshold).graphemes(true).count() <= threshold)
    }

    quickcheck(has_max_length_threshold as fn(_, _) -> TestResult);

    fn has_ellipsis_at_the_end(text: String, threshold: usize) -> TestResult {
        if threshold < 4 {
            return TestResult::discard();
        }
        if text.graphemes(true).count() <= threshold {
            return TestResult::discard();
        }
        let ellipsized = ellipsize(&text, threshold);
        TestResult::from_bool(ellipsized.ends_with("..."))
    }

    quickcheck(has_ellipsis_at_the_end as fn(_, _) -> TestResult);
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Largest first, the first unit that fits at least once wins.
const UNITS: [(&str, i64); 6] = [
    ("year", YEAR),
    ("month", MONTH),
    ("week", WEEK),
    ("day", DAY),
    ("hour", HOUR),
    ("minute", MINUTE),
];

/// Relative time from now.
pub trait RelativeFromNow {
    fn relative_from_now(&self) -> Since;
}

impl<T> RelativeFromNow for DateTime<T>
where
    T: TimeZone,
{
    fn relative_from_now(&self) -> Since {
        let duration = Utc::now().signed_duration_since(self.clone());
        Since(duration)
    }
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Since(chrono::Duration);

impl Since {
    pub fn between<T: TimeZone>(then: &DateTime<T>, now: &DateTime<Utc>) -> Self {
        Self(now.signed_duration_since(then.clone()))
    }
}

impl fmt::Display for Since {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.0.num_seconds();
        let unit = UNITS.iter().map(|(unit, size)| (unit, seconds / size)).find(|(_, n)| *n >= 1);
        match unit {
            Some((unit, 1)) => write!(f, "1 {unit} ago"),
            Some((unit, n)) => write!(f, "{n} {unit}s ago"),
            None => write!(f, "Just now"),
        }
    }
}

/// Formats how long ago `then` was, as seen from `now`.
pub fn time_ago<T: TimeZone>(then: &DateTime<T>, now: &DateTime<Utc>) -> String {
    Since::between(then, now).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(duration: Duration) -> String {
        let now = Utc.with_ymd_and_hms(2022, 7, 1, 12, 0, 0).unwrap();
        time_ago(&(now - duration), &now)
    }

    #[test]
    fn test_time_ago() {
        assert_eq!(ago(Duration::seconds(30)), "Just now");
        assert_eq!(ago(Duration::seconds(59)), "Just now");
        assert_eq!(ago(Duration::seconds(60)), "1 minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::hours(1)), "1 hour ago");
        assert_eq!(ago(Duration::hours(23)), "23 hours ago");
        assert_eq!(ago(Duration::days(2)), "2 days ago");
        assert_eq!(ago(Duration::days(7)), "1 week ago");
        assert_eq!(ago(Duration::days(29)), "4 weeks ago");
        assert_eq!(ago(Duration::days(30)), "1 month ago");
        assert_eq!(ago(Duration::days(364)), "12 months ago");
        assert_eq!(ago(Duration::days(400)), "1 year ago");
        assert_eq!(ago(Duration::days(800)), "2 years ago");
    }

    #[test]
    fn test_time_ago_in_the_future() {
        assert_eq!(ago(Duration::hours(-3)), "Just now");
    }

    #[test]
    fn test_relative_from_now() {
        let then = Utc::now() - Duration::days(3);
        assert_eq!(then.relative_from_now().to_string(), "3 days ago");
    }
}

/// Terminal row for a ranked repository.
#[derive(Debug)]
pub struct RepositoryRow<'a>(pub &'a RepositorySummary);

impl fmt::Display for RepositoryRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repo = self.0;

        write_col!(f, REPO_NAME_LEN, &repo.name)?;

        let desc = repo.description.as_deref().unwrap_or_default();
        write_col!(, f, REPO_DESC_LEN, desc)?;

        let lang = repo.language.as_deref().unwrap_or_default();
        write_col!(, f, LANG_NAME_LEN, lang)?;

        write_col!(, f, COUNT_LEN, &format!("*{}", repo.stargazers_count))?;
        write_col!(, f, COUNT_LEN, &format!("Y{}", repo.forks_count))?;

        let pushed = repo
            .pushed_at
            .as_ref()
            .map(|x| x.relative_from_now().to_string())
            .map(Cow::Owned)
            .unwrap_or_default();
        write_col!(, f, PUSHED_AT_LEN, &pushed)?;

        Ok(())
    }
}

/// Terminal summary of a profile.
#[derive(Debug)]
pub struct ProfileSummary<'a> {
    pub username: &'a str,
    pub profile: &'a UserProfile,
}

impl fmt::Display for ProfileSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.profile;
        let login = profile.login.as_deref().unwrap_or(self.username);
        match &profile.name {
            Some(name) => writeln!(f, "{name} ({login})")?,
            None => writeln!(f, "{login}")?,
        }
        writeln!(f, "{:>12} {}", "repositories", profile.public_repos.unwrap_or_default())?;
        writeln!(f, "{:>12} {}", "followers", profile.followers.unwrap_or_default())?;
        writeln!(f, "{:>12} {}", "following", profile.following.unwrap_or_default())?;
        write!(f, "{:>12} {}", "gists", profile.public_gists.unwrap_or_default())?;
        Ok(())
    }
}

#[cfg(test)]
#[test]
fn test_repository_row_without_optional_fields() {
    let repo = RepositorySummary {
        name: "shub".to_owned(),
        description: None,
        language: None,
        stargazers_count: 3,
        forks_count: 1,
        html_url: "https://github.com/kafji/shub".to_owned(),
        fork: false,
        pushed_at: None,
    };
    let row = RepositoryRow(&repo).to_string();
    assert!(row.starts_with("shub "));
    assert!(row.contains("*3"));
    assert!(row.contains("Y1"));
}

#[cfg(test)]
#[test]
fn test_profile_summary_defaults_missing_counts() {
    let profile = UserProfile { public_repos: Some(4), ..Default::default() };
    let summary = ProfileSummary { username: "kafji", profile: &profile }.to_string();
    assert!(summary.starts_with("kafji\n"));
    assert!(summary.contains("followers 0"));
    assert!(summary.contains("repositories 4"));
}
