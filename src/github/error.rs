use http::StatusCode;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum Error {
    #[error("request to GitHub failed")]
    Http(#[from] reqwest::Error),

    #[error("GitHub answered `{url}` with {status}")]
    Status { url: Url, status: StatusCode },

    #[error("unexpected response body from `{url}`")]
    Json {
        url: Url,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Header(#[from] http::header::InvalidHeaderValue),
}
