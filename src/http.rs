use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, SportsHubError};

/// Send `request` and return the response body, failing on non-success statuses.
///
/// Error bodies are mined for a human readable detail (Jira `errorMessages`
/// or `errors`, OpenRouter `error.message`).
pub(crate) async fn send_text(request: reqwest::RequestBuilder, url: &str) -> Result<String> {
    debug!(url, "sending request");

    let response = request.send().await.map_err(|e| SportsHubError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SportsHubError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })?;

    if !status.is_success() {
        return Err(SportsHubError::UnexpectedStatus {
            url: url.to_owned(),
            status,
            detail: error_detail(&body),
        });
    }

    Ok(body)
}

/// Like [`send_text`], decoding the body as JSON.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<T> {
    let body = send_text(request, url).await?;
    Ok(serde_json::from_str(&body)?)
}

fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let messages: Vec<&str> = value
        .get("errorMessages")
        .and_then(|m| m.as_array())
        .map(|m| m.iter().filter_map(|s| s.as_str()).collect())
        .unwrap_or_default();
    if !messages.is_empty() {
        return Some(messages.join(", "));
    }

    let errors: Vec<&str> = value
        .get("errors")
        .and_then(|e| e.as_object())
        .map(|e| e.values().filter_map(|s| s.as_str()).collect())
        .unwrap_or_default();
    if !errors.is_empty() {
        return Some(errors.join(", "));
    }

    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_owned)
}
