/// External provider clients
///
/// Thin request/response wrappers around the third-party HTTP APIs. Each
/// client is constructed from configuration, issues single synchronous
/// requests with no retry, and surfaces transport/status failures to the
/// caller.
pub mod graph;
pub mod listing;
pub mod llm;
pub mod vision;

use crate::error::{DeskError, DeskResult};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("Orbit-Desk/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used by all provider wrappers
pub(crate) fn build_http_client() -> DeskResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(15))
        .build()
        .map_err(|e| DeskError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Check the response status, then decode the JSON body
///
/// A non-success status becomes RemoteFetch carrying the status code and the
/// raw body; an undecodable body becomes Parse.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> DeskResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DeskError::RemoteFetch {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| DeskError::Parse(format!("Invalid provider response: {}", e)))
}

/// Map a reqwest transport error (connect/timeout) to a DeskError
pub(crate) fn transport_error(context: &str, e: reqwest::Error) -> DeskError {
    DeskError::Internal(format!("{}: {}", context, e))
}
