//! Error types for the SDK

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{kind} not found: {identifier}")]
    NotFound { kind: String, identifier: String },

    #[error("API request failed: {status} {code}: {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
        body: Option<Value>,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Unexpected response: {0}")]
    Unexpected(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(kind: &str, identifier: &str) -> Self {
        Error::NotFound {
            kind: kind.to_string(),
            identifier: identifier.to_string(),
        }
    }

    /// Build an API error from a non-success response.
    ///
    /// Pulls `code`/`message` out of the IaaS `errors` array, the resource
    /// controller `message` field, or the Power `description` field, in that
    /// order, and keeps the full body for callers that need it.
    pub fn from_response(status: StatusCode, body: Option<Value>) -> Self {
        let first = body
            .as_ref()
            .and_then(|b| b.get("errors"))
            .and_then(|e| e.as_array())
            .and_then(|e| e.first());

        let code = first
            .and_then(|e| e.get("code"))
            .or_else(|| body.as_ref().and_then(|b| b.get("code")))
            .or_else(|| body.as_ref().and_then(|b| b.get("error")))
            .map(value_to_string)
            .unwrap_or_else(|| default_code(status).to_string());

        let message = first
            .and_then(|e| e.get("message"))
            .or_else(|| body.as_ref().and_then(|b| b.get("message")))
            .or_else(|| body.as_ref().and_then(|b| b.get("description")))
            .or_else(|| body.as_ref().and_then(|b| b.get("errorMessage")))
            .map(value_to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

        Error::Api {
            status,
            code,
            message,
            body,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    /// Response body carried by an API error, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Error::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

fn default_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::CONFLICT => "conflict",
        StatusCode::TOO_MANY_REQUESTS => "rate_limited",
        s if s.is_server_error() => "server_error",
        _ => "request_failed",
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response_uses_iaas_errors_array() {
        let body = json!({
            "errors": [{"code": "vpc_not_found", "message": "VPC not found"}],
            "trace": "abc"
        });
        match Error::from_response(StatusCode::NOT_FOUND, Some(body)) {
            Error::Api { code, message, body, .. } => {
                assert_eq!(code, "vpc_not_found");
                assert_eq!(message, "VPC not found");
                assert_eq!(body.unwrap()["trace"], "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_response_without_body() {
        let err = Error::from_response(StatusCode::CONFLICT, None);
        match err {
            Error::Api { code, message, .. } => {
                assert_eq!(code, "conflict");
                assert_eq!(message, "Conflict");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_power_description_is_message() {
        let body = json!({"description": "pvm-instance does not exist", "error": "not found"});
        let err = Error::from_response(StatusCode::BAD_REQUEST, Some(body));
        assert!(err.to_string().contains("pvm-instance does not exist"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::not_found("VPC", "my-vpc").is_not_found());
        assert!(!Error::MissingArgument("name").is_not_found());
    }
}
