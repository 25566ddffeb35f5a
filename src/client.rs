use crate::auth::VaultToken;
use crate::error::VaultError;
use crate::models::{VaultHealthResponse, VaultResponse, VaultSealStatusResponse};
use crate::properties::VaultEndpoint;
use crate::transport::{RawResponse, ReqwestTransport, Transport};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const API_VERSION: &str = "v1";

const HEALTH_PATH: &str = "sys/health";
const SEAL_STATUS_PATH: &str = "sys/seal-status";
const UNSEAL_PATH: &str = "sys/unseal";

/// Outcome of a Vault request. Non-2xx statuses are not errors at this level;
/// callers decide how to surface them.
#[derive(Debug, Clone)]
pub struct VaultClientResponse {
    pub body: Option<VaultResponse>,
    pub status: u16,
    pub uri: String,
    pub message: String,
}

impl VaultClientResponse {
    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Low-level Vault client: URI construction plus read/write over a [`Transport`]
#[derive(Clone)]
pub struct VaultClient {
    endpoint: VaultEndpoint,
    transport: Arc<dyn Transport>,
}

impl VaultClient {
    pub fn new(endpoint: VaultEndpoint, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    /// Client using the default reqwest transport
    pub fn with_reqwest(endpoint: VaultEndpoint) -> Self {
        Self::new(endpoint, Arc::new(ReqwestTransport::new()))
    }

    pub fn endpoint(&self) -> &VaultEndpoint {
        &self.endpoint
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// `{scheme}://{host}:{port}/v1/{path}`
    pub fn build_uri(&self, path: &str) -> Result<String, VaultError> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Err(VaultError::InvalidConfig("Path must not be empty".to_string()));
        }
        Ok(format!(
            "{}://{}:{}/{}/{}",
            self.endpoint.scheme, self.endpoint.host, self.endpoint.port, API_VERSION, path
        ))
    }

    pub async fn read(&self, path: &str, token: &VaultToken) -> Result<VaultClientResponse, VaultError> {
        let uri = self.build_uri(path)?;
        let raw = self.transport.get(&uri, Some(token.token())).await?;
        Ok(Self::into_client_response(uri, raw))
    }

    pub async fn write(
        &self,
        path: &str,
        body: &serde_json::Value,
        token: Option<&VaultToken>,
    ) -> Result<VaultClientResponse, VaultError> {
        let uri = self.build_uri(path)?;
        let raw = self
            .transport
            .post(&uri, body, token.map(VaultToken::token))
            .await?;
        Ok(Self::into_client_response(uri, raw))
    }

    pub async fn health(&self) -> Result<VaultHealthResponse, VaultError> {
        let uri = self.build_uri(HEALTH_PATH)?;
        let raw = self.transport.get(&uri, None).await?;
        // standby, sealed and uninitialized servers answer with 429/503/501 and a regular body
        Self::parse_status_body(raw)
    }

    pub async fn seal_status(&self) -> Result<VaultSealStatusResponse, VaultError> {
        let uri = self.build_uri(SEAL_STATUS_PATH)?;
        let raw = self.transport.get(&uri, None).await?;
        Self::parse_success_body(raw)
    }

    pub async fn unseal(&self, key: &str) -> Result<VaultSealStatusResponse, VaultError> {
        let uri = self.build_uri(UNSEAL_PATH)?;
        let body = serde_json::json!({ "key": key });
        let raw = self.transport.put(&uri, &body, None).await?;
        Self::parse_success_body(raw)
    }

    fn into_client_response(uri: String, raw: RawResponse) -> VaultClientResponse {
        if !raw.is_success() {
            return VaultClientResponse {
                body: None,
                status: raw.status,
                uri,
                message: error_message(&raw),
            };
        }

        let body = if raw.body.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<VaultResponse>(&raw.body) {
                Ok(body) => Some(body),
                Err(e) => {
                    tracing::debug!(uri = %uri, error = %e, "Vault returned an unparseable body");
                    None
                }
            }
        };

        VaultClientResponse {
            body,
            status: raw.status,
            uri,
            message: reason_phrase(raw.status),
        }
    }

    fn parse_success_body<T: DeserializeOwned>(raw: RawResponse) -> Result<T, VaultError> {
        if !raw.is_success() {
            return Err(VaultError::ClientError {
                status: raw.status,
                message: error_message(&raw),
            });
        }
        Ok(serde_json::from_str(&raw.body)?)
    }

    fn parse_status_body<T: DeserializeOwned>(raw: RawResponse) -> Result<T, VaultError> {
        serde_json::from_str(&raw.body).map_err(|_| VaultError::ClientError {
            status: raw.status,
            message: error_message(&raw),
        })
    }
}

/// Flattens a Vault error body into a single message.
///
/// JSON bodies carry `{"errors": [...]}`; a single entry is returned verbatim,
/// several are joined. Anything else falls back to the raw body, then to the
/// status reason phrase when the body is empty.
pub fn error_message(raw: &RawResponse) -> String {
    if raw.is_json() {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw.body) {
            if let Some(errors) = value.get("errors").and_then(|e| e.as_array()) {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| match e.as_str() {
                        Some(s) => s.to_string(),
                        None => e.to_string(),
                    })
                    .collect();
                if !messages.is_empty() {
                    return messages.join(", ");
                }
            }
        }
    }

    if raw.body.trim().is_empty() {
        reason_phrase(raw.status)
    } else {
        raw.body.clone()
    }
}

fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown status")
        .to_string()
}
