use super::{html::escape, icons};
use crate::{
    display::time_ago,
    github::responses::{EventKind, EventRepo, PublicEvent, RawEvent},
};
use chrono::{DateTime, Utc};
use std::{borrow::Cow, fmt};

/// Length of the activity feed.
pub const ACTIVITY_LIMIT: usize = 6;

/// Keeps the first events the feed knows how to show, in the order received.
pub fn select_events(events: impl IntoIterator<Item = RawEvent>) -> Vec<PublicEvent> {
    events
        .into_iter()
        .filter_map(|x| PublicEvent::try_from(x).ok())
        .take(ACTIVITY_LIMIT)
        .collect()
}

/// What happened, without the markup.
#[derive(PartialEq, Clone, Debug)]
pub enum Action<'a> {
    Pushed { commits: u64 },
    Created { ref_type: &'a str, ref_name: Option<&'a str> },
    Starred,
    Forked,
    PullRequest { opened: bool },
    Issue { opened: bool },
}

impl<'a> From<&'a EventKind> for Action<'a> {
    fn from(kind: &'a EventKind) -> Self {
        match kind {
            EventKind::Push { size, commits } => {
                let commits = size
                    .filter(|x| *x != 0)
                    .or_else(|| commits.map(|x| x as u64).filter(|x| *x != 0))
                    .unwrap_or(1);
                Action::Pushed { commits }
            }
            EventKind::Create { ref_type, ref_name } => Action::Created {
                ref_type: ref_type.as_deref().unwrap_or("repository"),
                ref_name: ref_name.as_deref().filter(|x| !x.is_empty()),
            },
            EventKind::Watch => Action::Starred,
            EventKind::Fork => Action::Forked,
            EventKind::PullRequest { action } => {
                Action::PullRequest { opened: action.as_deref() == Some("opened") }
            }
            EventKind::Issues { action } => {
                Action::Issue { opened: action.as_deref() == Some("opened") }
            }
        }
    }
}

fn opened_or_updated(opened: bool) -> &'static str {
    if opened {
        "Opened"
    } else {
        "Updated"
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct ActivityItem<'a> {
    pub action: Action<'a>,
    pub repo: &'a EventRepo,
    pub created_at: DateTime<Utc>,
}

impl<'a> ActivityItem<'a> {
    pub fn from_event(event: &'a PublicEvent) -> Self {
        Self { action: (&event.kind).into(), repo: &event.repo, created_at: event.created_at }
    }

    /// Icon markup.
    pub fn icon(&self) -> Cow<'static, str> {
        match self.action {
            Action::Pushed { .. } => icons::COMMIT.into(),
            Action::Created { .. } => icons::PLUS.into(),
            Action::Starred => icons::STAR.into(),
            Action::Forked => icons::fork().into(),
            Action::PullRequest { .. } => icons::PULL_REQUEST.into(),
            Action::Issue { .. } => icons::ISSUE.into(),
        }
    }

    /// Class that colours the icon.
    pub fn category(&self) -> &'static str {
        match self.action {
            Action::Pushed { .. } => "push",
            Action::Created { .. } | Action::Issue { .. } => "create",
            Action::Starred => "star",
            Action::Forked | Action::PullRequest { .. } => "fork",
        }
    }

    fn repo_link(&self) -> String {
        format!(
            r#"<a href="https://github.com/{}" target="_blank">{}</a>"#,
            escape(&self.repo.name),
            escape(self.repo.short_name())
        )
    }

    /// Sentence markup.
    pub fn text_html(&self) -> String {
        let link = self.repo_link();
        match &self.action {
            Action::Pushed { commits } => {
                format!("Pushed <strong>{commits} commit{}</strong> to {link}", plural(*commits))
            }
            Action::Created { ref_type, ref_name: Some(ref_name) } => format!(
                "Created {} <strong>{}</strong> in {link}",
                escape(ref_type),
                escape(ref_name)
            ),
            Action::Created { ref_type, ref_name: None } => {
                format!("Created {} {link}", escape(ref_type))
            }
            Action::Starred => format!("Starred {link}"),
            Action::Forked => format!("Forked {link}"),
            Action::PullRequest { opened } => format!("{} PR in {link}", opened_or_updated(*opened)),
            Action::Issue { opened } => format!("{} issue in {link}", opened_or_updated(*opened)),
        }
    }

    pub fn to_html(&self, now: &DateTime<Utc>) -> String {
        format!(
            concat!(
                "<div class=\"activity-item\">\n",
                "  <div class=\"activity-icon {category}\">{icon}</div>\n",
                "  <div class=\"activity-content\">\n",
                "    <div class=\"activity-text\">{text}</div>\n",
                "    <div class=\"activity-time\">{time}</div>\n",
                "  </div>\n",
                "</div>\n",
            ),
            category = self.category(),
            icon = self.icon(),
            text = self.text_html(),
            time = time_ago(&self.created_at, now),
        )
    }
}

/// Plain text sentence, for terminals.
impl fmt::Display for ActivityItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repo = self.repo.short_name();
        match &self.action {
            Action::Pushed { commits } => {
                write!(f, "Pushed {commits} commit{} to {repo}", plural(*commits))
            }
            Action::Created { ref_type, ref_name: Some(ref_name) } => {
                write!(f, "Created {ref_type} {ref_name} in {repo}")
            }
            Action::Created { ref_type, ref_name: None } => write!(f, "Created {ref_type} {repo}"),
            Action::Starred => write!(f, "Starred {repo}"),
            Action::Forked => write!(f, "Forked {repo}"),
            Action::PullRequest { opened } => {
                write!(f, "{} PR in {repo}", opened_or_updated(*opened))
            }
            Action::Issue { opened } => {
                write!(f, "{} issue in {repo}", opened_or_updated(*opened))
            }
        }
    }
}

/// Markup for the activity feed.
pub fn render_activity_feed(events: &[PublicEvent], now: &DateTime<Utc>) -> String {
    events.iter().map(|x| ActivityItem::from_event(x).to_html(now)).collect()
}
