use crate::error::VaultError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

/// HTTP response as seen by the client, independent of the HTTP library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|mime| {
                let mime = mime.trim().to_ascii_lowercase();
                mime == "application/json" || mime.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

/// HTTP capability the client needs. Connection pooling, TLS client
/// certificates and timeouts are configured on the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, uri: &str, token: Option<&str>) -> Result<RawResponse, VaultError>;

    async fn post(
        &self,
        uri: &str,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> Result<RawResponse, VaultError>;

    async fn put(
        &self,
        uri: &str,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> Result<RawResponse, VaultError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client, e.g. one carrying a TLS identity for cert auth
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<RawResponse, VaultError> {
        let response = request
            .send()
            .await
            .map_err(|e| VaultError::RequestError(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| VaultError::RequestError(e.to_string()))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, uri: &str, token: Option<&str>) -> Result<RawResponse, VaultError> {
        let mut request = self.client.get(uri);
        if let Some(token) = token {
            request = request.header(VAULT_TOKEN_HEADER, token);
        }
        Self::send(request).await
    }

    async fn post(
        &self,
        uri: &str,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> Result<RawResponse, VaultError> {
        let mut request = self.client.post(uri).json(body);
        if let Some(token) = token {
            request = request.header(VAULT_TOKEN_HEADER, token);
        }
        Self::send(request).await
    }

    async fn put(
        &self,
        uri: &str,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> Result<RawResponse, VaultError> {
        let mut request = self.client.put(uri).json(body);
        if let Some(token) = token {
            request = request.header(VAULT_TOKEN_HEADER, token);
        }
        Self::send(request).await
    }
}
