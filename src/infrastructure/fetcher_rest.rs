use std::time::Duration;

use anyhow::{Context, anyhow};
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url, header::ACCEPT};

use crate::{FetcherError, RepositoryFetcher, RepositoryKey, StdResult, UpstreamRepository};

/// The REST production endpoint for GitHub.
pub const GITHUB_REST_ENDPOINT: &str = "https://api.github.com";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches repository metadata from the GitHub REST API.
pub struct RestFetcher {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl RestFetcher {
    /// Creates a new `RestFetcher` instance.
    ///
    /// The bearer token is attached to every request, an empty token is treated as no token.
    pub fn try_new(endpoint: &str, api_token: Option<String>, timeout: Duration) -> StdResult<Self> {
        let base_url =
            Url::parse(endpoint).with_context(|| format!("Invalid API endpoint: {endpoint}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API endpoint can not be used as a base URL: {endpoint}"));
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .with_context(|| "Failed to build the HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_token: api_token.filter(|token| !token.is_empty()),
        })
    }

    fn repository_url(&self, key: &RepositoryKey) -> Result<Url, FetcherError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetcherError::Transport(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["repos", key.owner().as_str(), key.name().as_str()]);

        Ok(url)
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for RestFetcher {
    async fn fetch(
        &self,
        key: &RepositoryKey,
    ) -> Result<Option<UpstreamRepository>, FetcherError> {
        let url = self.repository_url(key)?;
        debug!("Fetching {url}");
        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(api_token) = &self.api_token {
            request = request.bearer_auth(api_token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetcherError::Transport(e.to_string()))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GitHub answered {key} with status {status}: {body}");
            return Err(FetcherError::Remote {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetcherError::Transport(e.to_string()))?;
        serde_json::from_slice::<UpstreamRepository>(&body)
            .map(Some)
            .map_err(|e| FetcherError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::{MockServer, prelude::HttpMockRequest};
    use serde_json::json;

    use crate::DetailsError;

    use super::*;

    fn has_no_authorization_header(request: &HttpMockRequest) -> bool {
        request.headers.as_ref().is_none_or(|headers| {
            !headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case("authorization"))
        })
    }

    fn mock_json_value() -> serde_json::Value {
        json!({
            "id": 1296269,
            "full_name": "octocat/Hello-World",
            "description": "This is your first repo!",
            "clone_url": "https://github.com/octocat/Hello-World.git",
            "stargazers_count": 80,
            "created_at": "2025-01-26T19:01:12Z"
        })
    }

    fn build_fetcher(server: &MockServer, api_token: Option<String>) -> RestFetcher {
        RestFetcher::try_new(&server.url(""), api_token, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn try_new_fails_with_invalid_endpoint() {
        RestFetcher::try_new("not an url", None, Duration::from_secs(5))
            .err()
            .expect("Invalid endpoint should be rejected");
    }

    #[tokio::test]
    async fn fetch_existing_repository() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/repos/octocat/Hello-World")
                .header("Accept", "application/json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_json_value());
        });
        let fetcher = build_fetcher(&server, None);

        let upstream = fetcher
            .fetch(&RepositoryKey::dummy())
            .await
            .unwrap()
            .unwrap();

        mock.assert();
        assert_eq!(UpstreamRepository::dummy(), upstream);
    }

    #[tokio::test]
    async fn fetch_attaches_bearer_token_when_configured() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/repos/octocat/Hello-World")
                .header("Authorization", "Bearer credentials");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_json_value());
        });
        let fetcher = build_fetcher(&server, Some("credentials".to_string()));

        fetcher.fetch(&RepositoryKey::dummy()).await.unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn fetch_omits_authorization_header_without_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/repos/octocat/Hello-World")
                .matches(has_no_authorization_header);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_json_value());
        });
        let fetcher = build_fetcher(&server, None);

        fetcher.fetch(&RepositoryKey::dummy()).await.unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn fetch_omits_authorization_header_with_empty_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/repos/octocat/Hello-World")
                .matches(has_no_authorization_header);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_json_value());
        });
        let fetcher = build_fetcher(&server, Some(String::new()));

        fetcher.fetch(&RepositoryKey::dummy()).await.unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn fetch_missing_repository_returns_none() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/repos/someuser/unknownrepo");
            then.status(404);
        });
        let fetcher = build_fetcher(&server, None);

        let upstream = fetcher
            .fetch(&RepositoryKey::try_new("someuser", "unknownrepo").unwrap())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(None, upstream);
    }

    #[tokio::test]
    async fn fetch_fails_with_remote_error_on_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/repos/octocat/Hello-World");
            then.status(502).body("upstream proxy 10.0.0.7 refused");
        });
        let fetcher = build_fetcher(&server, None);

        let error = fetcher
            .fetch(&RepositoryKey::dummy())
            .await
            .expect_err("Server error should fail");

        assert_eq!(
            FetcherError::Remote {
                status: 502,
                reason: "Bad Gateway".to_string()
            },
            error
        );
        assert!(!DetailsError::from(error).to_string().contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn fetch_fails_with_parse_error_on_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/repos/octocat/Hello-World");
            then.status(200)
                .header("Content-Type", "application/json")
                .body("{\"description\": 42}");
        });
        let fetcher = build_fetcher(&server, None);

        let error = fetcher
            .fetch(&RepositoryKey::dummy())
            .await
            .expect_err("Malformed body should fail");

        assert!(matches!(error, FetcherError::Parse(_)));
    }

    #[tokio::test]
    async fn fetch_fails_with_transport_error_on_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/repos/octocat/Hello-World");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(mock_json_value());
        });
        let fetcher =
            RestFetcher::try_new(&server.url(""), None, Duration::from_millis(100)).unwrap();

        let error = fetcher
            .fetch(&RepositoryKey::dummy())
            .await
            .expect_err("Slow upstream should time out");

        assert!(matches!(error, FetcherError::Transport(_)));
    }

    #[test]
    fn repository_url_keeps_endpoint_path_prefix() {
        let fetcher = RestFetcher::try_new(
            "https://github.example.com/api/v3/",
            None,
            Duration::from_secs(5),
        )
        .unwrap();

        let url = fetcher.repository_url(&RepositoryKey::dummy()).unwrap();

        assert_eq!(
            "https://github.example.com/api/v3/repos/octocat/Hello-World",
            url.as_str()
        );
    }
}
