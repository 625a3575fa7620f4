use std::time::Duration;

use reqwest::Method;
use thiserror::Error;

use crate::gh::types::{Package, PackageVersion};

const BASE_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("ghpc/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SCOPE_HINT: &str = "token needs the read:packages and delete:packages scopes";

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("authentication failed (401): token is invalid or expired")]
    Auth,
    #[error("permission denied (403): {0}")]
    Permission(String),
    #[error("not found (404): {0}")]
    NotFound(String),
    #[error("validation failed (422): {0}")]
    Validation(String),
    #[error("rate limited (429): slow down and retry later")]
    RateLimit,
    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("unexpected API response: {0}")]
    Decode(String),
    #[error("network error: {0}")]
    Transport(String),
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Maps an HTTP error status plus the raw response body to a classified
/// error. A malformed body falls back to a status-only message.
pub fn classify(status: u16, body: &str) -> ApiError {
    let server_msg = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty());
    match status {
        401 => ApiError::Auth,
        403 => ApiError::Permission(server_msg.unwrap_or_else(|| SCOPE_HINT.to_string())),
        404 => {
            ApiError::NotFound(server_msg.unwrap_or_else(|| "no such package or version".to_string()))
        }
        422 => ApiError::Validation(server_msg.unwrap_or_else(|| "request was rejected".to_string())),
        429 => ApiError::RateLimit,
        _ => ApiError::Api {
            status,
            message: server_msg.unwrap_or_else(|| format!("request failed with status {status}")),
        },
    }
}

/// Authenticated GitHub API client for container package operations.
/// Stateless between calls; cheap to clone into spawned tasks.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    token: String,
}

impl Client {
    pub fn new(token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.to_string(),
        }
    }

    async fn request(&self, method: Method, path: &str) -> Result<String, ApiError> {
        let url = format!("{BASE_URL}{path}");
        let response = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!("{method} {path} -> {status}");

        if status >= 400 {
            return Err(classify(status, &body));
        }
        Ok(body)
    }

    /// Lists the authenticated user's container packages. The first call
    /// doubles as token validation.
    pub async fn list_packages(&self) -> Result<Vec<Package>, ApiError> {
        let body = self
            .request(Method::GET, "/user/packages?package_type=container")
            .await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn list_package_versions(
        &self,
        package_name: &str,
    ) -> Result<Vec<PackageVersion>, ApiError> {
        let path = format!("/user/packages/container/{package_name}/versions?per_page=100");
        let body = self.request(Method::GET, &path).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn delete_package_version(
        &self,
        package_name: &str,
        version_id: u64,
    ) -> Result<(), ApiError> {
        let path = format!("/user/packages/container/{package_name}/versions/{version_id}");
        self.request(Method::DELETE, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_401_as_auth() {
        assert!(matches!(classify(401, "{}"), ApiError::Auth));
    }

    #[test]
    fn classify_403_uses_server_detail() {
        let err = classify(403, r#"{"message": "delete:packages scope missing"}"#);
        match err {
            ApiError::Permission(detail) => assert_eq!(detail, "delete:packages scope missing"),
            other => panic!("expected Permission, got {other:?}"),
        }
    }

    #[test]
    fn classify_403_falls_back_to_scope_hint() {
        match classify(403, "") {
            ApiError::Permission(detail) => assert_eq!(detail, SCOPE_HINT),
            other => panic!("expected Permission, got {other:?}"),
        }
    }

    #[test]
    fn classify_404_as_not_found() {
        assert!(matches!(classify(404, "{}"), ApiError::NotFound(_)));
    }

    #[test]
    fn classify_422_as_validation() {
        let err = classify(422, r#"{"message": "version is the last tagged one"}"#);
        match err {
            ApiError::Validation(detail) => {
                assert_eq!(detail, "version is the last tagged one");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn classify_429_as_rate_limit() {
        assert!(matches!(classify(429, "{}"), ApiError::RateLimit));
    }

    #[test]
    fn classify_other_status_keeps_server_message() {
        match classify(502, r#"{"message": "bad gateway"}"#) {
            ApiError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn classify_malformed_body_uses_status_fallback() {
        match classify(500, "<html>nope</html>") {
            ApiError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "request failed with status 500");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn classify_empty_message_field_uses_fallback() {
        match classify(404, r#"{"message": ""}"#) {
            ApiError::NotFound(detail) => assert_eq!(detail, "no such package or version"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
