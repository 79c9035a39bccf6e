//! Request/response adapter for the ComIDP data-extract endpoint

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

/// Status code the service reports for a successful extraction
pub const SUCCESS_CODE: &str = "200";

/// Remote extraction service seam.
///
/// The orchestrator talks to the service through this trait so tests can
/// substitute a mock without touching the network.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Submit one document and return the raw response body text.
    ///
    /// Transport failures propagate as errors; a non-2xx body still flows
    /// back as text, since business-level interpretation is layered above.
    async fn extract(&self, path: &Path, api_key: &str) -> Result<String>;
}

#[async_trait]
impl<T: ExtractionBackend + ?Sized> ExtractionBackend for std::sync::Arc<T> {
    async fn extract(&self, path: &Path, api_key: &str) -> Result<String> {
        (**self).extract(path, api_key).await
    }
}

/// Raw response envelope from the extraction endpoint.
#[derive(Debug, Deserialize)]
pub struct ExtractResponse {
    /// Status code; the service emits both string and numeric forms
    #[serde(default)]
    pub code: serde_json::Value,
    /// Human-readable message, present on failure
    #[serde(default)]
    pub msg: Option<String>,
    /// Extraction payload; a JSON object or a scalar
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ExtractResponse {
    /// Parse a raw response body.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// String form of the status code.
    pub fn code_str(&self) -> String {
        match &self.code {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the service reported success.
    pub fn is_success(&self) -> bool {
        self.code_str() == SUCCESS_CODE
    }
}

/// HTTP client for the ComIDP extraction service.
///
/// Stateless aside from the connection pool; the credential is supplied per
/// call by the orchestrator.
#[derive(Debug, Clone)]
pub struct IdpClient {
    http: reqwest::Client,
    endpoint: String,
}

impl IdpClient {
    /// Build a client for the configured endpoint and request timeout.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let endpoint = url::Url::parse(&config.endpoint).map_err(|_| Error::InvalidEndpoint {
            url: config.endpoint.clone(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    /// Submit an in-memory document under the given file name.
    pub async fn extract_bytes(
        &self,
        data: Vec<u8>,
        file_name: String,
        api_key: &str,
    ) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/pdf")?;

        // The three filter fields are reserved in the wire contract and
        // always sent empty.
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("keys", "")
            .text("tableHandles", "")
            .text("pages", "");

        let response = self
            .http
            .post(&self.endpoint)
            .header("api_key", api_key)
            .multipart(form)
            .send()
            .await?;

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ExtractionBackend for IdpClient {
    async fn extract(&self, path: &Path, api_key: &str) -> Result<String> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());

        self.extract_bytes(data, file_name, api_key).await
    }
}
