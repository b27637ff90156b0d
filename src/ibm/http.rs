//! HTTP utilities for IBM Cloud REST API calls

use crate::error::{Error, Result};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::Level;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// How a request authenticates
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    Basic { username: &'a str, password: &'a str },
}

/// Request payload
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Form(Vec<(String, String)>),
    Raw { content_type: String, bytes: Vec<u8> },
}

/// Status and body of a completed request, whatever the status
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub bytes: Vec<u8>,
}

impl RawResponse {
    /// Parse the body as JSON. Empty or non-JSON bodies give `None`.
    pub fn json(&self) -> Option<Value> {
        if self.bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return None;
        }
        serde_json::from_slice(&self.bytes).ok()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// HTTP client wrapper for IBM Cloud API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with a uniform request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ibmcloud-sdk/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Send a request and return its status and body.
    ///
    /// Non-success statuses are not errors here; callers decide what they mean.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        auth: Auth<'_>,
        headers: &[(String, String)],
        body: Option<&Body>,
    ) -> Result<RawResponse> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(reqwest::header::ACCEPT, "application/json");

        request = match auth {
            Auth::None => request,
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
        };

        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        request = match body {
            Some(Body::Json(value)) => request.json(value),
            Some(Body::Form(fields)) => request.form(fields),
            Some(Body::Raw {
                content_type,
                bytes,
            }) => request
                .header(reqwest::header::CONTENT_TYPE, content_type.as_str())
                .body(bytes.clone()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?.to_vec();

        match failure_level(status) {
            Some(Level::ERROR) => {
                // Only log sanitized/truncated error bodies
                tracing::error!(
                    "API error: {} {} - {}",
                    method,
                    status,
                    sanitize_for_log(&String::from_utf8_lossy(&bytes))
                );
            },
            Some(_) => tracing::debug!("{} {} - not found", method, status),
            None => {},
        }

        Ok(RawResponse { status, bytes })
    }
}

/// Level a failed response is logged at. 404s are routine while resolving
/// identifiers.
fn failure_level(status: StatusCode) -> Option<Level> {
    if status.is_success() {
        None
    } else if status == StatusCode::NOT_FOUND {
        Some(Level::DEBUG)
    } else {
        Some(Level::ERROR)
    }
}

/// Format an SDK error for display
pub fn format_error(error: &Error) -> String {
    match error {
        Error::Api { status, .. } => match status.as_u16() {
            401 => "Authentication failed. Check IC_API_KEY.".to_string(),
            403 => "Permission denied. Check your IAM access policies.".to_string(),
            404 => "Resource not found.".to_string(),
            409 => "Resource conflict. The resource may already exist or be in use.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            400 => "Invalid request. Check your parameters.".to_string(),
            s if s >= 500 => "IBM Cloud service temporarily unavailable. Please try again.".to_string(),
            _ => "Request failed. Check your network connection and try again.".to_string(),
        },
        other => {
            let error_str = other.to_string();
            let sanitized = error_str
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(80)
                .collect::<String>();

            if sanitized.len() < error_str.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_logs_at_debug() {
        assert_eq!(failure_level(StatusCode::OK), None);
        assert_eq!(failure_level(StatusCode::NOT_FOUND), Some(Level::DEBUG));
        assert_eq!(failure_level(StatusCode::CONFLICT), Some(Level::ERROR));
        assert_eq!(failure_level(StatusCode::INTERNAL_SERVER_ERROR), Some(Level::ERROR));
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("a\nb\tc d"), "abc d");
    }

    #[test]
    fn test_sanitize_handles_multibyte_boundary() {
        let body = "é".repeat(150);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("bytes total"));
    }

    #[test]
    fn test_raw_response_json() {
        let empty = RawResponse {
            status: StatusCode::NO_CONTENT,
            bytes: Vec::new(),
        };
        assert!(empty.json().is_none());

        let body = RawResponse {
            status: StatusCode::OK,
            bytes: br#"{"id": "r006-1"}"#.to_vec(),
        };
        assert_eq!(body.json().unwrap()["id"], "r006-1");
    }

    #[test]
    fn test_format_error_messages() {
        let err = Error::from_response(StatusCode::FORBIDDEN, None);
        assert!(format_error(&err).contains("Permission denied"));

        let err = Error::MissingArgument("vpc");
        assert_eq!(format_error(&err), "Missing required argument: vpc");
    }
}
