use std::error::Error;
use std::time::Instant;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::error::ApiError;

/// Log a failed send with as much detail as reqwest exposes.
pub fn log_send_error(url: &str, err: &ApiError) {
    error!("Failed HTTP request to {}: {}", url, err);

    let ApiError::Request(e) = err else {
        return;
    };
    if let Some(source) = e.source() {
        error!("Error source: {:?}", source);
    }
    if e.is_timeout() {
        error!("Request timed out");
    }
    if e.is_connect() {
        error!("Connection error");
    }
    if e.is_body() {
        error!("Body error");
    }
}

/// Turn a settled response into an error unless its status is 2xx.
///
/// Failure bodies are not parsed; only logged at debug level.
pub async fn ensure_success(
    url: &str,
    started: Instant,
    response: Response,
) -> Result<Response, ApiError> {
    let status = response.status();
    info!(
        "Got response from {} after {:?} with status {}",
        url,
        started.elapsed(),
        status
    );

    if status.is_success() {
        return Ok(response);
    }

    warn!("Request to {} failed with status {}", url, status);
    if let Ok(body) = response.text().await {
        tracing::debug!("Error body: {}", body);
    }
    Err(ApiError::Status { status })
}

/// Read the whole body and decode it as JSON.
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        warn!("Malformed response body: {}", e);
        ApiError::Decode(e)
    })
}
