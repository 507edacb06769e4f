use crate::{
    calendar::CalendarWidget,
    config::FolioConfig,
    display::{ProfileSummary, RelativeFromNow, RepositoryRow},
    document::{ids, Document},
    github::{fetch_all, GhClient, GitHubApi, GitHubData},
    nav::NavScript,
    render::{
        rank_repositories, render_activity_feed, render_top_repositories, select_events,
        ActivityItem, Stats,
    },
};
use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use console::Term;
use std::{io::Write, path::Path};
use tokio::fs;
use tracing::{error, info};

#[derive(Debug)]
pub struct App<'a, GitHubClient> {
    config: &'a FolioConfig,
    github_client: GitHubClient,
}

impl<'a> App<'a, GhClient> {
    pub fn new(config: &'a FolioConfig) -> Result<Self, Error> {
        let github_client = GhClient::new(config.api_base_url.clone())?;
        Ok(Self { config, github_client })
    }
}

impl<'a, GitHubClient> App<'a, GitHubClient>
where
    GitHubClient: GitHubApi + Sync,
{
    pub fn with_client(config: &'a FolioConfig, github_client: GitHubClient) -> Self {
        Self { config, github_client }
    }

    fn username(&self) -> &str {
        &self.config.username
    }

    /// Renders the page template.
    ///
    /// When fetching fails the error is logged and the data slots are left
    /// as the template has them.
    #[tracing::instrument(skip_all)]
    pub async fn render_page(&self, template: &str, now: &DateTime<Utc>) -> Result<String, Error> {
        let mut doc = Document::new(template);
        doc.require(ids::CALENDAR);
        doc.require(ids::NAV);
        doc.require(ids::NAV_LINKS);

        let calendar = CalendarWidget::new(self.username(), self.config.calendar);
        doc.inject_before_body_end(calendar.script_element()?);
        doc.inject_before_body_end(NavScript::new(self.config.nav).script_element()?);

        match fetch_all(&self.github_client, self.username()).await {
            Ok(data) => fill_document(&mut doc, &data, self.config, now)?,
            Err(err) => error!(%err, "error fetching GitHub data"),
        }

        let page = doc.render()?;
        Ok(page)
    }

    /// Reads the template, renders it and writes the page.
    pub async fn build_page(&self, template_path: &Path, out_path: &Path) -> Result<(), Error> {
        let template = fs::read_to_string(template_path).await.with_context(|| {
            format!("Failed to read template at `{}`.", template_path.display())
        })?;

        let page = self.render_page(&template, &Utc::now()).await?;

        if let Some(dir) = out_path.parent().filter(|x| !x.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        fs::write(out_path, page)
            .await
            .with_context(|| format!("Failed to write page to `{}`.", out_path.display()))?;

        info!(out = %out_path.display(), "page written");
        Ok(())
    }

    pub async fn print_stats(&self) -> Result<(), Error> {
        let profile = self.github_client.get_user(self.username()).await?;
        let mut stdout = Term::buffered_stdout();
        writeln!(stdout, "{}", ProfileSummary { username: self.username(), profile: &profile })?;
        stdout.flush()?;
        Ok(())
    }

    pub async fn print_top_repositories(&self) -> Result<(), Error> {
        let repos = self.github_client.list_repositories(self.username()).await?;
        let mut stdout = Term::buffered_stdout();
        for repo in rank_repositories(&repos) {
            writeln!(stdout, "{}", RepositoryRow(repo))?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub async fn print_activity(&self) -> Result<(), Error> {
        let events = self.github_client.list_public_events(self.username()).await?;
        let events = select_events(events);
        let mut stdout = Term::buffered_stdout();
        for event in &events {
            let item = ActivityItem::from_event(event);
            writeln!(stdout, "{:<14} {}", event.created_at.relative_from_now().to_string(), item)?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_calendar_script(&self) -> Result<(), Error> {
        let calendar = CalendarWidget::new(self.username(), self.config.calendar);
        println!("{}", calendar.bootstrap_script()?);
        Ok(())
    }
}

fn fill_document(
    doc: &mut Document,
    data: &GitHubData,
    config: &FolioConfig,
    now: &DateTime<Utc>,
) -> Result<(), Error> {
    for (id, text) in Stats::from_profile(&data.profile).slots() {
        doc.set_text(id, &text);
    }

    let repos = render_top_repositories(&data.repositories, &config.language_colors)?;
    doc.set_inner_html(ids::REPOS_GRID, repos);

    let events = select_events(data.events.iter().cloned());
    doc.set_inner_html(ids::ACTIVITY_LIST, render_activity_feed(&events, now));

    Ok(())
}
