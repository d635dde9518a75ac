use crate::{RepositoryDetails, RepositoryKey, RepositoryRecord, StdResult};

/// A trait for persisting repository snapshots to a storage medium.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryPersister: Sync + Send {
    /// Saves a snapshot on behalf of `actor`, keyed by owner and repository name.
    ///
    /// A first save inserts a record with a fresh identifier, a later save for the same key
    /// refreshes the snapshot and the modification stamps of the existing record.
    async fn save(&self, details: &RepositoryDetails, actor: &str) -> StdResult<RepositoryRecord>;

    /// Finds the record stored for the given owner and repository name.
    async fn find_by_owner_and_name(
        &self,
        key: &RepositoryKey,
    ) -> StdResult<Option<RepositoryRecord>>;
}
