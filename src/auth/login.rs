use super::VaultToken;
use crate::client::{VaultClient, VaultClientResponse};
use crate::error::VaultError;
use crate::properties::AuthenticationMethod;
use std::collections::HashMap;
use std::time::Duration;

const MISSING_CLIENT_TOKEN: &str = "missing client token";

/// Login outcome flattened from a [`VaultClientResponse`].
/// A failed response never carries a token.
#[derive(Debug, Clone, Default)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub lease_duration: Option<u64>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    pub error_message: Option<String>,
}

impl LoginResponse {
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key)?.as_str()
    }

    /// Token carried by a successful response
    pub fn token(&self, method: AuthenticationMethod) -> Result<VaultToken, VaultError> {
        if !self.success {
            let message = self
                .error_message
                .clone()
                .unwrap_or_else(|| "login rejected".to_string());
            return Err(VaultError::auth_failed(method, message));
        }

        match self.token.as_deref() {
            Some(token) if !token.is_empty() => VaultToken::new(
                token,
                Duration::from_secs(self.lease_duration.unwrap_or_default()),
            ),
            _ => Err(VaultError::auth_failed(method, MISSING_CLIENT_TOKEN)),
        }
    }
}

impl From<VaultClientResponse> for LoginResponse {
    fn from(response: VaultClientResponse) -> Self {
        if !response.is_successful() {
            return Self {
                success: false,
                error_message: Some(response.message),
                ..Self::default()
            };
        }

        match response.body.and_then(|body| body.auth) {
            Some(auth) => Self {
                success: true,
                token: auth.client_token,
                lease_duration: Some(auth.lease_duration),
                metadata: auth.metadata,
                error_message: None,
            },
            None => Self {
                success: true,
                ..Self::default()
            },
        }
    }
}

/// POSTs `payload` to `auth/{auth_path}/login`
pub(crate) async fn submit(
    client: &VaultClient,
    method: AuthenticationMethod,
    auth_path: &str,
    payload: &serde_json::Value,
) -> Result<LoginResponse, VaultError> {
    let path = format!("auth/{}/login", auth_path);
    let response = client
        .write(&path, payload, None)
        .await
        .map_err(|e| attempted(method, e))?;
    Ok(LoginResponse::from(response))
}

/// Names the login method in transport failures
pub(crate) fn attempted(method: AuthenticationMethod, err: VaultError) -> VaultError {
    match err {
        VaultError::RequestError(message) => {
            VaultError::RequestError(format!("{} login: {}", method.description(), message))
        }
        other => other,
    }
}
