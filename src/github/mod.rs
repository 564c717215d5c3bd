
use async_trait::async_trait;
use mockall::automock;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::storage::{RepoId, RepoSummary, SearchResultSet};

/// Number of repositories requested per search.
pub const PER_PAGE: u8 = 5;

/// Errors returned while querying the GitHub search API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The API answered with a non-success status.
    #[error("Error status code ({status})\nResponse: {body}")]
    RequestError {
        /// HTTP status of the response.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },
    /// The request could not be sent or the body could not be read.
    #[error("Network error: {source}")]
    Network {
        /// Underlying transport error.
        #[from]
        source: reqwest::Error,
    },
    /// The body is not a search response.
    #[error("Malformed search response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
    /// The configured search URL does not parse.
    #[error("Invalid search endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

type Result<T> = std::result::Result<T, GithubError>;

/// Remote repository search.
#[automock]
#[async_trait]
pub trait GithubClient: Send + Sync {
    /// Search repositories by name, returning at most [`PER_PAGE`] results.
    async fn search_repositories(&self, query: &str) -> Result<SearchResultSet>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: u64,
    name: String,
    owner: SearchItemOwner,
    stargazers_count: u64,
}

#[derive(Debug, Deserialize)]
struct SearchItemOwner {
    login: String,
}

/// Map a raw search response body to a result set, keeping the API's order.
fn parse_search_response(body: &str) -> Result<SearchResultSet> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(GithubError::MalformedResponse)?;

    Ok(response
        .items
        .into_iter()
        .map(|item| {
            let summary = RepoSummary {
                name: item.name,
                owner: item.owner.login,
                stars: item.stargazers_count,
            };
            (RepoId::from(item.id), summary)
        })
        .collect())
}

/// [`GithubClient`] backed by the GitHub REST search endpoint.
#[derive(Clone)]
pub struct DefaultGithubClient {
    client: Client,
    search_url: Url,
}

impl DefaultGithubClient {
    /// Creates a client sending requests to `search_url`.
    pub fn new(search_url: &str) -> Result<Self> {
        let search_url = Url::parse(search_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("repo-picker"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        tracing::debug!("HTTP client built successfully.");

        Ok(Self { client, search_url })
    }

    /// Build the request URL for `query`, overriding `per_page` and `q` on the
    /// configured endpoint.
    fn search_url_for(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "per_page" && key != "q")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("q", query);
        url
    }
}

#[async_trait]
impl GithubClient for DefaultGithubClient {
    async fn search_repositories(&self, query: &str) -> Result<SearchResultSet> {
        let url = self.search_url_for(query);
        tracing::debug!("Searching repositories: {url}");

        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(GithubError::RequestError { status, body });
        }

        let results = parse_search_response(&body)?;
        tracing::debug!("Search for {query:?} returned {} repositories", results.len());
        Ok(results)
    }
}
