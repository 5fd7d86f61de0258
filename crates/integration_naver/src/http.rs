//! Shared request plumbing for the Naver clients

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::NaverError;

pub(crate) const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
pub(crate) const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";
pub(crate) const APIGW_KEY_ID_HEADER: &str = "x-apigw-api-key-id";
pub(crate) const APIGW_KEY_HEADER: &str = "x-apigw-api-key";

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, NaverError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("placefinder/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| NaverError::ConnectionFailed(e.to_string()))
}

pub(crate) fn send_error(err: &reqwest::Error, timeout_secs: u64) -> NaverError {
    if err.is_timeout() {
        NaverError::Timeout { timeout_secs }
    } else {
        NaverError::ConnectionFailed(err.to_string())
    }
}

/// Pull a human-readable message out of the provider's error body
///
/// Search APIs send `{"errorMessage": ...}`, the API gateway sends
/// `{"error": {"message": ...}}`.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().chars().take(200).collect();
    };
    value
        .get("errorMessage")
        .or_else(|| value.pointer("/error/message"))
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    timeout_secs: u64,
) -> Result<T, NaverError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| send_error(&e, timeout_secs))?;

    if !status.is_success() {
        let message = error_message(&body);
        warn!(status = status.as_u16(), %message, "Naver API returned an error status");
        return Err(NaverError::Http {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| NaverError::ParseError(e.to_string()))
}
