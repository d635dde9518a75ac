use std::{fmt::Display, ops::Deref};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RepositoryKey;

/// The name of a repository.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(pub String);

impl Deref for RepositoryName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of the owner (user or organization) of a repository.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerName(pub String);

impl Deref for OwnerName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for OwnerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The number of stars a repository has.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarsCounter(pub u32);

impl Deref for StarsCounter {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for StarsCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Repository metadata as returned by the GitHub REST API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRepository {
    /// The full name of the repository, conventionally `owner/name`.
    pub full_name: String,
    pub description: Option<String>,
    pub clone_url: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    /// The creation time of the repository, as an ISO-8601 string.
    pub created_at: Option<String>,
}

impl UpstreamRepository {
    /// Creates a dummy `UpstreamRepository` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self {
            full_name: "octocat/Hello-World".to_string(),
            description: Some("This is your first repo!".to_string()),
            clone_url: Some("https://github.com/octocat/Hello-World.git".to_string()),
            stargazers_count: 80,
            created_at: Some("2025-01-26T19:01:12Z".to_string()),
        }
    }
}

impl Display for UpstreamRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "UpstreamRepository: {}, Stars: {}, CreatedAt: {:?}",
            self.full_name, self.stargazers_count, self.created_at
        )
    }
}

/// A snapshot of a repository, before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDetails {
    /// The owner of the repository, as supplied by the caller.
    pub(crate) owner: OwnerName,

    /// The name of the repository, as supplied by the caller.
    pub(crate) repo_name: RepositoryName,

    /// The full name of the repository, as reported upstream.
    pub(crate) full_name: String,

    pub(crate) description: Option<String>,

    pub(crate) clone_url: Option<String>,

    /// The number of stars the repository has.
    pub(crate) stars: StarsCounter,

    /// The creation time of the repository.
    pub(crate) created_at: Option<DateTime<Utc>>,
}

impl RepositoryDetails {
    /// Creates a new `RepositoryDetails` instance.
    pub fn new(
        key: &RepositoryKey,
        full_name: &str,
        description: Option<String>,
        clone_url: Option<String>,
        stars: u32,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            owner: key.owner().to_owned(),
            repo_name: key.name().to_owned(),
            full_name: full_name.to_string(),
            description,
            clone_url,
            stars: StarsCounter(stars),
            created_at,
        }
    }

    /// Retrieves the key identifying the repository.
    pub fn key(&self) -> RepositoryKey {
        RepositoryKey {
            owner: self.owner.to_owned(),
            name: self.repo_name.to_owned(),
        }
    }

    /// Retrieves the owner.
    pub fn owner(&self) -> &OwnerName {
        &self.owner
    }

    /// Retrieves the repository name.
    pub fn repo_name(&self) -> &RepositoryName {
        &self.repo_name
    }

    /// Retrieves the full name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Retrieves the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Retrieves the clone URL.
    pub fn clone_url(&self) -> Option<&str> {
        self.clone_url.as_deref()
    }

    /// Retrieves the stars of the repository.
    pub fn stars(&self) -> &StarsCounter {
        &self.stars
    }

    /// Retrieves the creation time of the repository.
    pub fn created_at(&self) -> Option<&DateTime<Utc>> {
        self.created_at.as_ref()
    }

    /// Creates a dummy `RepositoryDetails` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self::new(
            &RepositoryKey::dummy(),
            "octocat/Hello-World",
            Some("This is your first repo!".to_string()),
            Some("https://github.com/octocat/Hello-World.git".to_string()),
            80,
            DateTime::parse_from_rfc3339("2025-01-26T19:01:12Z")
                .ok()
                .map(|created_at| created_at.with_timezone(&Utc)),
        )
    }
}

impl Display for RepositoryDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repository: {}, Owner: {}, FullName: {}, Stars: {}",
            self.repo_name, self.owner, self.full_name, self.stars
        )
    }
}

/// Audit metadata stamped by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamps {
    /// The actor who created the record.
    pub created_by: String,
    /// The time at which the record was created.
    pub create_time: DateTime<Utc>,
    /// The actor who last modified the record.
    pub updated_by: String,
    /// The time at which the record was last modified.
    pub update_time: DateTime<Utc>,
}

impl AuditStamps {
    /// Creates audit stamps for a record created by `actor` at `time`.
    pub fn created(actor: &str, time: DateTime<Utc>) -> Self {
        Self {
            created_by: actor.to_string(),
            create_time: time,
            updated_by: actor.to_string(),
            update_time: time,
        }
    }

    /// Returns a copy of the stamps, modified by `actor` at `time`.
    pub fn modified(&self, actor: &str, time: DateTime<Utc>) -> Self {
        Self {
            created_by: self.created_by.to_owned(),
            create_time: self.create_time,
            updated_by: actor.to_string(),
            update_time: time,
        }
    }
}

/// A persisted repository snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    /// The identifier assigned by the store.
    pub(crate) id: i64,

    /// The persisted snapshot.
    pub(crate) details: RepositoryDetails,

    /// The audit metadata.
    pub(crate) audit: AuditStamps,
}

impl RepositoryRecord {
    /// Creates a new `RepositoryRecord` instance.
    pub fn new(id: i64, details: RepositoryDetails, audit: AuditStamps) -> Self {
        Self { id, details, audit }
    }

    /// Retrieves the identifier.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Retrieves the persisted snapshot.
    pub fn details(&self) -> &RepositoryDetails {
        &self.details
    }

    /// Retrieves the audit metadata.
    pub fn audit(&self) -> &AuditStamps {
        &self.audit
    }

    /// Creates a dummy `RepositoryRecord` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self::new(
            1,
            RepositoryDetails::dummy(),
            AuditStamps::created("system", Utc::now()),
        )
    }
}

impl Display for RepositoryRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {}, UpdatedBy: {}",
            self.id, self.details, self.audit.updated_by
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_repository_deserializes_nullable_fields() {
        let upstream: UpstreamRepository = serde_json::from_str(
            r#"{"full_name":"octocat/Hello-World","description":null,"clone_url":null,"stargazers_count":3,"created_at":null,"watchers":3}"#,
        )
        .unwrap();

        assert_eq!(
            UpstreamRepository {
                full_name: "octocat/Hello-World".to_string(),
                description: None,
                clone_url: None,
                stargazers_count: 3,
                created_at: None,
            },
            upstream
        );
    }

    #[test]
    fn upstream_repository_rejects_negative_stars() {
        serde_json::from_str::<UpstreamRepository>(
            r#"{"full_name":"octocat/Hello-World","stargazers_count":-1}"#,
        )
        .expect_err("Negative stars should not deserialize");
    }

    #[test]
    fn modified_audit_stamps_keep_creation_stamps() {
        let created_at = Utc::now();
        let stamps = AuditStamps::created("system", created_at);
        let later = created_at + chrono::Duration::seconds(5);

        let modified = stamps.modified("refresher", later);

        assert_eq!("system", modified.created_by);
        assert_eq!(created_at, modified.create_time);
        assert_eq!("refresher", modified.updated_by);
        assert_eq!(later, modified.update_time);
    }
}
