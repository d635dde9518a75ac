use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// Fetcher error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetcherError {
    /// Transport error (connection refused, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),
    /// Remote error, the API answered with a non-success status other than 404.
    ///
    /// `reason` is the canonical reason phrase of the status, never the response body.
    #[error("Remote error: status={status}, {reason}")]
    Remote { status: u16, reason: String },
    /// Parse error
    #[error("Parsing error: {0}")]
    Parse(String),
}

impl FetcherError {
    /// Whether a new attempt of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetcherError::Transport(_) => true,
            FetcherError::Remote { status, .. } => *status >= 500 || *status == 429,
            FetcherError::Parse(_) => false,
        }
    }
}

/// Error returned when retrieving the details of a repository.
///
/// It is `Clone` so that a single failure can be handed to every caller waiting on the same lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetailsError {
    /// The owner or the name of the repository is invalid.
    #[error("Invalid repository key: {0}")]
    InvalidKey(String),

    /// The repository does not exist upstream.
    #[error("Repository not found for owner: '{owner}' and name: '{name}'")]
    NotFound { owner: String, name: String },

    /// The upstream API could not be reached or answered with an error.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The upstream payload could not be interpreted.
    #[error("Parse failure: {0}")]
    Parse(String),

    /// The local store is unavailable.
    #[error("Storage failure: {0}")]
    Storage(String),

    /// The lookup stopped before producing a result.
    #[error("Lookup interrupted: {0}")]
    Interrupted(String),
}

impl From<FetcherError> for DetailsError {
    fn from(error: FetcherError) -> Self {
        match error {
            FetcherError::Parse(message) => DetailsError::Parse(message),
            error => DetailsError::Transport(error.to_string()),
        }
    }
}
