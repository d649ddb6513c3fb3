//! Generic HTTP client tools
//!
//! One request flow shared by every call of [`HttpTransport`](crate::HttpTransport):
//! send, log, read the body, and turn non-2xx statuses into a classified
//! [`TransportError`].

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::error::TransportError;

/// Maximum number of bytes of a body to include in log output.
const TRUNCATE_LIMIT: usize = 256;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the response body
    ///
    /// # Returns
    /// * `Ok(Some(body))` - 2xx with a body
    /// * `Ok(None)` - 204, or 2xx with an empty body
    /// * `Err(TransportError)` - network failure, timeout or classified non-2xx status
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> Result<Option<String>, TransportError> {
        send(request_builder, method_name, url)
            .await
            .map_err(|failure| failure.error)
    }

    /// Parse a JSON response body
    pub fn parse_json<T>(response_text: &str) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("JSON parse failed: {e}");
            log::error!("Raw response: {}", truncate_for_log(response_text));
            TransportError::Parse {
                detail: e.to_string(),
            }
        })
    }

    /// Performs an HTTP request with retries
    ///
    /// # Retry strategy
    /// - Only retryable errors (see [`TransportError::is_retryable`])
    /// - Exponential backoff: 100ms, 200ms, 400ms, ... (maximum 10 seconds)
    /// - Callers pass `max_retries = 0` for non-idempotent requests
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
        max_retries: u32,
    ) -> Result<Option<String>, TransportError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, method_name, url).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder can only be sent once
            let Some(req) = request_builder.try_clone() else {
                log::warn!("Cannot clone {method_name} {url}, disabling retry");
                return Self::execute_request(request_builder, method_name, url).await;
            };

            match send(req, method_name, url).await {
                Ok(body) => return Ok(body),
                Err(Failure {
                    error: e,
                    retry_after,
                }) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(retry_after, attempt);
                    log::warn!(
                        "{} {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        method_name,
                        url,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(failure) => return Err(failure.error),
            }
        }

        Err(last_error.unwrap_or_else(|| TransportError::Network {
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// A failed attempt, with the server's `Retry-After` hint when it sent one.
struct Failure {
    error: TransportError,
    retry_after: Option<u64>,
}

impl From<TransportError> for Failure {
    fn from(error: TransportError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

async fn send(
    request_builder: RequestBuilder,
    method_name: &str,
    url: &str,
) -> Result<Option<String>, Failure> {
    log::debug!("{method_name} {url}");

    let response = request_builder.send().await.map_err(|e| {
        if e.is_timeout() {
            TransportError::Timeout {
                detail: e.to_string(),
            }
        } else {
            TransportError::Network {
                detail: e.to_string(),
            }
        }
    })?;

    let status_code = response.status().as_u16();
    log::debug!("{method_name} {url} -> {status_code}");

    // Read before the body consumes the response
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let body = response
        .text()
        .await
        .map_err(|e| TransportError::Network {
            detail: format!("Failed to read response body: {e}"),
        })?;

    log::debug!("Response Body: {}", truncate_for_log(&body));

    classify_response(status_code, body).map_err(|error| Failure { error, retry_after })
}

/// Map a status code and body to the transport result.
pub(crate) fn classify_response(
    status_code: u16,
    body: String,
) -> Result<Option<String>, TransportError> {
    match status_code {
        204 => Ok(None),
        200..=299 if body.trim().is_empty() => Ok(None),
        200..=299 => Ok(Some(body)),
        401 => Err(TransportError::Unauthorized {
            message: extract_error_message(&body),
        }),
        403 => Err(TransportError::Forbidden {
            message: extract_error_message(&body),
        }),
        status => Err(TransportError::Http {
            status,
            message: extract_error_message(&body),
        }),
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"message": ..}`, `{"detail": ..}`, `{"error": ..}` and validation
/// bodies of the form `{"detail": [{"msg": ..}, ..]}`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .find_map(|key| message_from(value.get(key)?))
}

fn message_from(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(entries) => {
            let messages: Vec<String> = entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => obj
                        .get("msg")
                        .or_else(|| obj.get("message"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Object(obj) => obj.get("message").and_then(message_from),
        _ => None,
    }
}

/// Calculate retry delay
///
/// A `Retry-After` hint wins (capped at 30s); otherwise exponential backoff.
fn retry_delay(retry_after: Option<u64>, attempt: u32) -> Duration {
    retry_after.map_or_else(
        || backoff_delay(attempt),
        |secs| Duration::from_secs(secs.min(30)),
    )
}

/// Calculate exponential backoff delay
///
/// Backoff strategy: 100ms, 200ms, 400ms, 800ms, 1.6s, ...
/// Maximum delay limit is 10 seconds
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // Prevent 2^attempt from overflowing
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}

/// Truncate a body for logging, on a char boundary.
fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut end = TRUNCATE_LIMIT;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}
