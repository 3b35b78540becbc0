//! HTTP client facade for the Reelbank video collection platform.
//!
//! Provides an authenticated [`ApiClient`] with generic GET/POST/DELETE
//! helpers and domain methods for project/dataset management, video upload
//! (by path, by content hash, and in batch), metadata retrieval, video and
//! frame download, and deletion. The client holds no cache and no state
//! beyond the authenticated handle: every call is an independent
//! request/response against the remote service.
//!
//! Batch methods issue exactly one request each; they exist to cut round
//! trips and must never be replaced by loops over the single-item calls.

pub mod api;
pub mod fs;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// API version prefix (e.g. "/api/v1"). Set REELBANK_API_VERSION to match
/// the server.
pub fn api_prefix() -> String {
    let version = std::env::var("REELBANK_API_VERSION").unwrap_or_else(|_| "v1".to_string());
    format!("/api/{}", version)
}

/// Authenticated HTTP client for the Reelbank API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

/// Non-success response body shape: `{ "code": ..., "message": ... }`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build from environment via [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn workspace_id(&self) -> i64 {
        self.config.workspace_id
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("X-API-Token", self.config.api_token.as_str())
    }

    fn transport_error(err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else {
            Error::Http(err.to_string())
        }
    }

    /// Map a non-success response onto the error taxonomy, logging the
    /// failed operation first.
    async fn error_from(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!(status, url = %url, "API request failed");

        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Error::from_response(
                status,
                body.code.as_deref(),
                body.message.unwrap_or(text),
            ),
            Err(_) => Error::from_response(status, None, text),
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| Error::Decode(format!("Failed to parse response as JSON: {}", e)))
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.apply_auth(self.client.get(&url));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(Self::transport_error)?;
        Self::decode(response).await
    }

    /// GET request returning the raw response body (video bytes, frame PNG).
    pub async fn get_bytes(&self, path: &str) -> Result<bytes::Bytes> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url));

        let response = request.send().await.map_err(Self::transport_error)?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        response.bytes().await.map_err(Self::transport_error)
    }

    /// POST JSON body with query parameters and deserialize the response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.apply_auth(self.client.post(&url).json(body));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(Self::transport_error)?;
        Self::decode(response).await
    }

    /// POST multipart form and deserialize the response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));

        let response = request.send().await.map_err(Self::transport_error)?;
        Self::decode(response).await
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.delete(&url));

        let response = request.send().await.map_err(Self::transport_error)?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

// Re-export the core types callers need alongside the client.
pub use reelbank_core::{
    ClientConfig, Dataset, Error, NameConflict, Project, ProjectKind, RemoveReport, Result,
    VideoAsset,
};
