
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    github::{GithubClient, GithubError},
    storage::{RepoId, RepoSummary, SearchResultSet},
};

/// Errors returned by a [`SearchService`].
#[derive(Debug, Error)]
pub enum SearchError {
    /// The GitHub search request failed.
    #[error(transparent)]
    Github(#[from] GithubError),
}

impl SearchError {
    /// The HTTP status if the search endpoint answered with a non-success status.
    pub fn request_status(&self) -> Option<reqwest::StatusCode> {
        match self {
            SearchError::Github(GithubError::RequestError { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

type Result<T> = std::result::Result<T, SearchError>;

/// Searches repositories and remembers the results of the latest request.
///
/// Every call carries a request number. Results of a request older than the
/// newest one seen are returned but never remembered.
#[automock]
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Search repositories by name. An empty query yields an empty set without
    /// touching the network.
    async fn search(&self, query: &str, request: u64) -> Result<SearchResultSet>;

    /// Forget the remembered results, as of `request`.
    async fn clear(&self, request: u64);

    /// Look up a repository from the last completed search.
    async fn lookup(&self, id: &RepoId) -> Option<RepoSummary>;
}

#[derive(Default)]
struct LastSearch {
    request: u64,
    results: SearchResultSet,
}

impl LastSearch {
    /// Start tracking `request` and drop the old results, unless a newer request
    /// is already tracked.
    fn begin(&mut self, request: u64) {
        if request >= self.request {
            self.request = request;
            self.results = SearchResultSet::new();
        }
    }
}

/// Search service backed by the GitHub client.
pub struct DefaultSearchService {
    github_client: Arc<dyn GithubClient>,
    last: Mutex<LastSearch>,
}

impl DefaultSearchService {
    /// Creates a service searching through `github_client`.
    pub fn new(github_client: Arc<dyn GithubClient>) -> Self {
        Self { github_client, last: Mutex::new(LastSearch::default()) }
    }
}

#[async_trait]
impl SearchService for DefaultSearchService {
    async fn search(&self, query: &str, request: u64) -> Result<SearchResultSet> {
        self.last.lock().await.begin(request);
        if query.is_empty() {
            return Ok(SearchResultSet::new());
        }

        let results = self.github_client.search_repositories(query).await?;

        let mut last = self.last.lock().await;
        if last.request == request {
            last.results = results.clone();
        } else {
            tracing::debug!("Not remembering results of superseded request {request}");
        }
        Ok(results)
    }

    async fn clear(&self, request: u64) {
        self.last.lock().await.begin(request);
    }

    async fn lookup(&self, id: &RepoId) -> Option<RepoSummary> {
        self.last.lock().await.results.get(id).cloned()
    }
}
