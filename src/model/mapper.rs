use chrono::{DateTime, Utc};

use super::{DetailsError, RepositoryDetails, RepositoryKey, UpstreamRepository};

/// Maps an upstream repository to a `RepositoryDetails` snapshot.
///
/// The owner and name always come from `key`, never from the upstream payload.
pub fn to_canonical(
    key: &RepositoryKey,
    upstream: UpstreamRepository,
) -> Result<RepositoryDetails, DetailsError> {
    let created_at = parse_instant(upstream.created_at.as_deref())?;

    Ok(RepositoryDetails::new(
        key,
        &upstream.full_name,
        upstream.description,
        upstream.clone_url,
        upstream.stargazers_count,
        created_at,
    ))
}

/// Parses an ISO-8601 instant, `None` and `""` both map to no instant.
fn parse_instant(value: Option<&str>) -> Result<Option<DateTime<Utc>>, DetailsError> {
    match value {
        None | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|instant| Some(instant.with_timezone(&Utc)))
            .map_err(|e| DetailsError::Parse(format!("invalid timestamp '{value}': {e}"))),
    }
}
