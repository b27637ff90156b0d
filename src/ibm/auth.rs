//! IAM Authentication
//!
//! Exchanges an IBM Cloud API key for a bearer token at the IAM token
//! endpoint and caches it until shortly before it expires.

use super::http::{Auth, Body, HttpClient};
use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Grant type for API key exchange
pub const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Path of the token endpoint on the auth connection
pub const TOKEN_PATH: &str = "identity/token";

/// Refresh tokens this many seconds before they actually expire
const TOKEN_EXPIRY_BUFFER_SECS: i64 = 60;

/// Token TTL used when IAM sends neither `expiration` nor `expires_in`
const DEFAULT_TOKEN_TTL_SECS: i64 = 30 * 60;

/// IAM token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expiration: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// A bearer token and what we know about it
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    /// Account the token was issued for (`account.bss` claim)
    pub account_id: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at - Duration::seconds(TOKEN_EXPIRY_BUFFER_SECS)
    }
}

/// API key credentials with token caching
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    token_url: String,
    http: HttpClient,
    token_cache: Arc<RwLock<Option<AccessToken>>>,
}

impl Credentials {
    pub fn new(api_key: &str, auth_base_url: &str, http: HttpClient) -> Self {
        Self {
            api_key: api_key.to_string(),
            token_url: format!("{}/{}", auth_base_url.trim_end_matches('/'), TOKEN_PATH),
            http,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Get an access token, reusing the cached one while it is valid
    pub async fn get_token(&self) -> Result<AccessToken> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let token = self.request_token().await?;

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(token.clone());
        }

        tracing::debug!("New token cached, expires at {}", token.expires_at);

        Ok(token)
    }

    /// Force refresh the token
    pub async fn refresh_token(&self) -> Result<AccessToken> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }

        self.get_token().await
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let form = Body::Form(vec![
            ("grant_type".to_string(), APIKEY_GRANT_TYPE.to_string()),
            ("apikey".to_string(), self.api_key.clone()),
        ]);

        let response = self
            .http
            .send(Method::POST, &self.token_url, Auth::None, &[], Some(&form))
            .await?;

        if !response.status.is_success() {
            let message = response
                .json()
                .and_then(|b| b.get("errorMessage").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| response.status.to_string());
            return Err(Error::Auth(message));
        }

        let parsed: TokenResponse = serde_json::from_slice(&response.bytes)?;

        let expires_at = parsed
            .expiration
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .or_else(|| parsed.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)))
            .unwrap_or_else(|| Utc::now() + Duration::seconds(DEFAULT_TOKEN_TTL_SECS));

        Ok(AccessToken {
            account_id: account_from_jwt(&parsed.access_token),
            token: parsed.access_token,
            expires_at,
        })
    }
}

/// Read the `account.bss` claim out of a JWT without verifying it
pub fn account_from_jwt(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&decoded).ok()?;

    claims
        .pointer("/account/bss")
        .and_then(|v| v.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fake_jwt(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_account_from_jwt() {
        let token = fake_jwt(&json!({"account": {"bss": "abc123"}, "iam_id": "IBMid-1"}));
        assert_eq!(account_from_jwt(&token).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_account_from_jwt_missing_claim() {
        let token = fake_jwt(&json!({"iam_id": "IBMid-1"}));
        assert!(account_from_jwt(&token).is_none());
        assert!(account_from_jwt("not-a-jwt").is_none());
    }

    #[test]
    fn test_token_validity_respects_buffer() {
        let fresh = AccessToken {
            token: "t".to_string(),
            account_id: None,
            expires_at: Utc::now() + Duration::minutes(10),
        };
        assert!(fresh.is_valid());

        let nearly_expired = AccessToken {
            expires_at: Utc::now() + Duration::seconds(30),
            ..fresh
        };
        assert!(!nearly_expired.is_valid());
    }
}
