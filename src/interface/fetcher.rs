use crate::{FetcherError, RepositoryKey, UpstreamRepository};

/// A trait for fetching repository metadata from the upstream API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryFetcher: Sync + Send {
    /// Fetches the repository metadata, `None` when the repository does not exist upstream.
    async fn fetch(&self, key: &RepositoryKey)
    -> Result<Option<UpstreamRepository>, FetcherError>;
}
