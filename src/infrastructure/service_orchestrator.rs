use std::{collections::HashMap, sync::Arc};

use log::{info, warn};
use tokio::sync::{Mutex, watch};

use crate::{
    DetailsError, RepositoryDetailsService, RepositoryFetcher, RepositoryKey, RepositoryPersister,
    RepositoryRecord, to_canonical,
};

type DetailsResult = Result<RepositoryRecord, DetailsError>;

/// Receives the outcome of a lookup, `None` until the lookup completes.
type LookupReceiver = watch::Receiver<Option<DetailsResult>>;

type InFlightLookups = Arc<Mutex<HashMap<RepositoryKey, LookupReceiver>>>;

/// Retrieves repository details upstream and persists them.
///
/// Each lookup runs in its own task: concurrent lookups of the same key share a single fetch
/// and save, every caller receives the same result, and a caller going away neither cancels
/// the lookup nor leaves it registered once it completes. Lookups of different keys are
/// independent.
pub struct DetailsOrchestrator {
    fetcher: Arc<dyn RepositoryFetcher>,
    persister: Arc<dyn RepositoryPersister>,
    actor: Arc<str>,
    in_flight: InFlightLookups,
}

impl DetailsOrchestrator {
    /// Creates a new `DetailsOrchestrator` instance, records are saved on behalf of `actor`.
    pub fn new(
        fetcher: Arc<dyn RepositoryFetcher>,
        persister: Arc<dyn RepositoryPersister>,
        actor: &str,
    ) -> Self {
        Self {
            fetcher,
            persister,
            actor: Arc::from(actor),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Spawns the lookup of `key`, the task unregisters itself from `in_flight` once done.
    ///
    /// Must be called while holding the `in_flight` lock, so that the task can not unregister
    /// before the caller registers the returned receiver.
    fn spawn_lookup(&self, key: &RepositoryKey) -> LookupReceiver {
        let (sender, receiver) = watch::channel(None);
        let fetcher = self.fetcher.clone();
        let persister = self.persister.clone();
        let actor = self.actor.clone();
        let in_flight = self.in_flight.clone();
        let key = key.to_owned();
        tokio::spawn(async move {
            let result =
                fetch_and_persist(fetcher.as_ref(), persister.as_ref(), &actor, &key).await;
            let mut in_flight = in_flight.lock().await;
            in_flight.remove(&key);
            sender.send_replace(Some(result));
        });

        receiver
    }
}

async fn fetch_and_persist(
    fetcher: &dyn RepositoryFetcher,
    persister: &dyn RepositoryPersister,
    actor: &str,
    key: &RepositoryKey,
) -> DetailsResult {
    let upstream = match fetcher.fetch(key).await? {
        Some(upstream) => upstream,
        None => {
            warn!("Repository {key} not found upstream");
            return Err(DetailsError::NotFound {
                owner: key.owner().to_string(),
                name: key.name().to_string(),
            });
        }
    };
    info!("Fetched {upstream}");

    let details = to_canonical(key, upstream)?;
    let record = persister
        .save(&details, actor)
        .await
        .map_err(|e| DetailsError::Storage(format!("{e:#}")))?;
    info!("Persisted {record}");

    Ok(record)
}

#[async_trait::async_trait]
impl RepositoryDetailsService for DetailsOrchestrator {
    async fn get_details(&self, key: &RepositoryKey) -> DetailsResult {
        let mut receiver = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(key) {
                // A closed channel means the lookup task died without a result.
                Some(receiver) if receiver.has_changed().is_ok() => receiver.clone(),
                _ => {
                    let receiver = self.spawn_lookup(key);
                    in_flight.insert(key.to_owned(), receiver.clone());
                    receiver
                }
            }
        };

        let result = match receiver.wait_for(Option::is_some).await {
            Ok(result) => result.clone(),
            Err(_) => None,
        };

        result.unwrap_or_else(|| {
            Err(DetailsError::Interrupted(format!(
                "lookup of {key} ended without a result"
            )))
        })
    }
}
