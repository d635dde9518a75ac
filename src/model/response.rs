use chrono::SecondsFormat;
use serde::Serialize;

use super::RepositoryRecord;

/// The JSON body returned by the HTTP API for a repository.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryResponse {
    /// Full name of the repository (e.g. `owner/repo`)
    pub(crate) full_name: String,

    pub(crate) description: Option<String>,

    pub(crate) clone_url: Option<String>,

    pub(crate) stars: u32,

    /// Creation time of the repository in RFC 3339 format
    pub(crate) created_at: Option<String>,
}

impl From<&RepositoryRecord> for RepositoryResponse {
    fn from(record: &RepositoryRecord) -> Self {
        let details = record.details();
        Self {
            full_name: details.full_name().to_string(),
            description: details.description().map(str::to_string),
            clone_url: details.clone_url().map(str::to_string),
            stars: **details.stars(),
            created_at: details
                .created_at()
                .map(|created_at| created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_record_in_camel_case() {
        let response = RepositoryResponse::from(&RepositoryRecord::dummy());

        assert_eq!(
            json!({
                "fullName": "octocat/Hello-World",
                "description": "This is your first repo!",
                "cloneUrl": "https://github.com/octocat/Hello-World.git",
                "stars": 80,
                "createdAt": "2025-01-26T19:01:12Z"
            }),
            serde_json::to_value(&response).unwrap()
        );
    }
}
