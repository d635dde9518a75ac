use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use log::{error, info, warn};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::{DetailsError, RepositoryDetailsService, RepositoryKey, RepositoryResponse, StdResult};

/// The shared state of the HTTP handlers.
pub type DetailsServiceState = Arc<dyn RepositoryDetailsService>;

/// Error returned by the HTTP handlers.
#[derive(Debug)]
pub struct ApiError(DetailsError);

impl From<DetailsError> for ApiError {
    fn from(error: DetailsError) -> Self {
        Self(error)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DetailsError::NotFound { .. } => return StatusCode::NOT_FOUND.into_response(),
            DetailsError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            DetailsError::Transport(_) | DetailsError::Parse(_) => StatusCode::BAD_GATEWAY,
            DetailsError::Storage(_) | DetailsError::Interrupted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.0.to_string(),
        });

        (status, body).into_response()
    }
}

/// Builds the router of the HTTP API.
pub fn router(service: DetailsServiceState) -> Router {
    Router::new()
        .route(
            "/repositories/{owner}/{name}",
            get(get_repository_details),
        )
        .with_state(service)
}

async fn get_repository_details(
    State(service): State<DetailsServiceState>,
    Path((owner, name)): Path<(String, String)>,
) -> Result<Json<RepositoryResponse>, ApiError> {
    let key = RepositoryKey::try_new(&owner, &name)?;
    match service.get_details(&key).await {
        Ok(record) => Ok(Json(RepositoryResponse::from(&record))),
        Err(e @ DetailsError::NotFound { .. }) => {
            warn!("{e}");
            Err(e.into())
        }
        Err(e) => {
            error!("Failed to retrieve details of {key}: {e}");
            Err(e.into())
        }
    }
}

/// Serves the HTTP API on the given address until the process stops.
pub async fn serve(listen_address: &str, service: DetailsServiceState) -> StdResult<()> {
    let listener = TcpListener::bind(listen_address)
        .await
        .with_context(|| format!("Failed to bind {listen_address}"))?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(service)).await?;

    Ok(())
}
