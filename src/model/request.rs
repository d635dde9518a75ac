use std::fmt::Display;

use serde::Serialize;

use super::{DetailsError, OwnerName, RepositoryName};

/// The key identifying a repository lookup: an owner and a repository name.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Hash)]
pub struct RepositoryKey {
    /// The owner of the repository.
    pub(crate) owner: OwnerName,

    /// The name of the repository.
    pub(crate) name: RepositoryName,
}

impl RepositoryKey {
    /// Creates a new `RepositoryKey`, rejecting an empty owner or name.
    pub fn try_new(owner: &str, name: &str) -> Result<Self, DetailsError> {
        if owner.trim().is_empty() {
            return Err(DetailsError::InvalidKey(
                "owner must not be empty".to_string(),
            ));
        }
        if name.trim().is_empty() {
            return Err(DetailsError::InvalidKey(
                "repository name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            owner: OwnerName(owner.to_string()),
            name: RepositoryName(name.to_string()),
        })
    }

    /// Retrieves the owner.
    pub fn owner(&self) -> &OwnerName {
        &self.owner
    }

    /// Retrieves the repository name.
    pub fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Creates a dummy `RepositoryKey` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self::try_new("octocat", "Hello-World").unwrap()
    }
}

impl Display for RepositoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
