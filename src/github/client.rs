use super::{
    error::Error,
    responses::{RawEvent, RepositorySummary, UserProfile},
};
use async_trait::async_trait;
use http::{
    header::{ACCEPT, USER_AGENT},
    HeaderMap, HeaderValue,
};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use std::{convert::TryInto, result::Result};
use tracing::debug;
use url::Url;

type ClientResult<T> = Result<T, Error>;

/// The parts of the GitHub REST API the portfolio reads from.
#[async_trait]
pub trait GitHubApi {
    /// [GitHub Docs](https://docs.github.com/en/rest/users/users#get-a-user)
    async fn get_user(&self, username: &str) -> ClientResult<UserProfile>;

    /// [GitHub Docs](https://docs.github.com/en/rest/repos/repos#list-repositories-for-a-user)
    async fn list_repositories(&self, username: &str) -> ClientResult<Vec<RepositorySummary>>;

    /// [GitHub Docs](https://docs.github.com/en/rest/activity/events#list-public-events-for-a-user)
    async fn list_public_events(&self, username: &str) -> ClientResult<Vec<RawEvent>>;
}

#[derive(Debug)]
pub struct GhClient {
    base_url: Url,
    http: Client,
}

impl GhClient {
    pub fn new(base_url: impl Into<Option<Url>>) -> ClientResult<Self> {
        let base_url: Url =
            base_url.into().map(Result::Ok).unwrap_or_else(|| "https://api.github.com/".parse())?;

        let headers = {
            let mut headers = HeaderMap::new();

            let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            headers.insert(USER_AGENT, HeaderValue::from_str(&user_agent)?);

            headers.insert(ACCEPT, "application/vnd.github.v3+json".try_into()?);

            headers
        };

        let http = ClientBuilder::new().default_headers(headers).build()?;

        let client = GhClient { base_url, http };
        debug!(?client);

        Ok(client)
    }

    fn build_url(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.build_url(path);
        let request = self.http.get(url).query(query);
        debug!(?request, "sending request");
        let response = request.send().await?;
        debug!(?response, "received response");

        let url = response.url().clone();
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { url, status });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| Error::Json { url, source })
    }
}

#[async_trait]
impl GitHubApi for GhClient {
    async fn get_user(&self, username: &str) -> ClientResult<UserProfile> {
        let path = format!("/users/{username}");
        let profile: UserProfile = self.get_json(&path, &[]).await?;
        debug!(?profile, "response body");
        Ok(profile)
    }

    async fn list_repositories(&self, username: &str) -> ClientResult<Vec<RepositorySummary>> {
        let path = format!("/users/{username}/repos");
        let repos: Vec<RepositorySummary> =
            self.get_json(&path, &[("per_page", "100"), ("sort", "updated")]).await?;
        debug!(count = repos.len(), "response body");
        Ok(repos)
    }

    async fn list_public_events(&self, username: &str) -> ClientResult<Vec<RawEvent>> {
        let path = format!("/users/{username}/events/public");
        let events: Vec<RawEvent> = self.get_json(&path, &[("per_page", "30")]).await?;
        debug!(count = events.len(), "response body");
        Ok(events)
    }
}

/// Everything the page renders from, fetched in one go.
#[derive(PartialEq, Clone, Debug)]
pub struct GitHubData {
    pub profile: UserProfile,
    pub repositories: Vec<RepositorySummary>,
    pub events: Vec<RawEvent>,
}

/// Fetches profile, repositories and events concurrently.
///
/// Fails as soon as any of the three requests fails.
#[tracing::instrument(skip(api))]
pub async fn fetch_all(api: &(impl GitHubApi + Sync), username: &str) -> ClientResult<GitHubData> {
    let (profile, repositories, events) = futures::try_join!(
        api.get_user(username),
        api.list_repositories(username),
        api.list_public_events(username),
    )?;
    Ok(GitHubData { profile, repositories, events })
}
