use std::collections::HashMap;

use chrono::Utc;
use log::info;
use tokio::sync::RwLock;

use crate::{
    AuditStamps, RepositoryDetails, RepositoryKey, RepositoryPersister, RepositoryRecord,
    StdResult,
};

#[derive(Debug, Default)]
struct InMemoryState {
    last_id: i64,
    records: HashMap<RepositoryKey, RepositoryRecord>,
}

/// A persister that keeps repository records in memory, one per owner and repository name.
#[derive(Debug, Default)]
pub struct InMemoryPersister {
    state: RwLock<InMemoryState>,
}

impl InMemoryPersister {
    /// Creates a new empty `InMemoryPersister` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn total_records(&self) -> usize {
        self.state.read().await.records.len()
    }
}

#[async_trait::async_trait]
impl RepositoryPersister for InMemoryPersister {
    async fn save(&self, details: &RepositoryDetails, actor: &str) -> StdResult<RepositoryRecord> {
        let now = Utc::now();
        let key = details.key();
        let mut state = self.state.write().await;
        let existing = state
            .records
            .get(&key)
            .map(|existing| (existing.id(), existing.audit().modified(actor, now)));
        let record = match existing {
            Some((id, audit)) => {
                let record = RepositoryRecord::new(id, details.to_owned(), audit);
                info!("Updated {record}");
                record
            }
            None => {
                state.last_id += 1;
                let record = RepositoryRecord::new(
                    state.last_id,
                    details.to_owned(),
                    AuditStamps::created(actor, now),
                );
                info!("Inserted {record}");
                record
            }
        };
        state.records.insert(key, record.clone());

        Ok(record)
    }

    async fn find_by_owner_and_name(
        &self,
        key: &RepositoryKey,
    ) -> StdResult<Option<RepositoryRecord>> {
        Ok(self.state.read().await.records.get(key).cloned())
    }
}
