use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Public profile of a user.
///
/// [GitHub Docs].
///
/// [GitHub Docs]: https://docs.github.com/en/rest/users/users#get-a-user
#[derive(Deserialize, PartialEq, Clone, Default, Debug)]
pub struct UserProfile {
    pub login: Option<String>,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub public_gists: Option<u64>,
}

#[derive(Deserialize, PartialEq, Clone, Debug)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub html_url: String,
    #[serde(default)]
    pub fork: bool,
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, PartialEq, Clone, Debug)]
pub struct EventRepo {
    /// In `:owner/:name` format.
    pub name: String,
}

impl EventRepo {
    /// Repository name without its owner.
    pub fn short_name(&self) -> &str {
        match self.name.split_once('/') {
            Some((_, name)) => name,
            None => &self.name,
        }
    }
}

/// Public event as it comes off the wire.
///
/// [GitHub Docs].
///
/// [GitHub Docs]: https://docs.github.com/en/rest/using-the-rest-api/github-event-types
#[derive(Deserialize, PartialEq, Clone, Debug)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub r#type: String,
    pub repo: EventRepo,
    #[serde(default)]
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(PartialEq, Clone, Debug)]
pub struct PublicEvent {
    pub repo: EventRepo,
    pub created_at: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(PartialEq, Clone, Debug)]
pub enum EventKind {
    Push { size: Option<u64>, commits: Option<usize> },
    Create { ref_type: Option<String>, ref_name: Option<String> },
    Watch,
    Fork,
    PullRequest { action: Option<String> },
    Issues { action: Option<String> },
}

#[derive(Deserialize, Default)]
struct PushPayload {
    size: Option<u64>,
    commits: Option<Vec<Value>>,
}

#[derive(Deserialize, Default)]
struct CreatePayload {
    ref_type: Option<String>,
    #[serde(rename = "ref")]
    ref_name: Option<String>,
}

#[derive(Deserialize, Default)]
struct ActionPayload {
    action: Option<String>,
}

fn payload<T>(event_type: &str, value: &Value) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    match T::deserialize(value) {
        Ok(x) => x,
        Err(err) => {
            debug!(event_type, %err, "unexpected payload shape, using defaults");
            T::default()
        }
    }
}

impl EventKind {
    /// Returns `None` for event types the activity feed does not show.
    pub fn from_raw(event_type: &str, value: &Value) -> Option<Self> {
        let kind = match event_type {
            "PushEvent" => {
                let PushPayload { size, commits } = payload(event_type, value);
                let commits = commits.map(|x| x.len());
                EventKind::Push { size, commits }
            }
            "CreateEvent" => {
                let CreatePayload { ref_type, ref_name } = payload(event_type, value);
                EventKind::Create { ref_type, ref_name }
            }
            "WatchEvent" => EventKind::Watch,
            "ForkEvent" => EventKind::Fork,
            "PullRequestEvent" => {
                let ActionPayload { action } = payload(event_type, value);
                EventKind::PullRequest { action }
            }
            "IssuesEvent" => {
                let ActionPayload { action } = payload(event_type, value);
                EventKind::Issues { action }
            }
            _ => return None,
        };
        Some(kind)
    }
}

impl TryFrom<RawEvent> for PublicEvent {
    type Error = RawEvent;

    /// Gives the event back when its type is not one the feed shows.
    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        match EventKind::from_raw(&raw.r#type, &raw.payload) {
            Some(kind) => Ok(PublicEvent { repo: raw.repo, created_at: raw.created_at, kind }),
            None => Err(raw),
        }
    }
}
