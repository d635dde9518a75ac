use crate::{DetailsError, RepositoryKey, RepositoryRecord};

/// A trait for retrieving the current details of a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryDetailsService: Sync + Send {
    /// Fetches the repository upstream, persists its snapshot and returns the stored record.
    async fn get_details(&self, key: &RepositoryKey) -> Result<RepositoryRecord, DetailsError>;
}
