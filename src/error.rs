use crate::properties::AuthenticationMethod;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Cannot create a token for auth method {method}")]
    UnsupportedMethod { method: String },

    #[error("Cannot login using {}: {message}", .method.description())]
    AuthenticationFailed {
        method: AuthenticationMethod,
        message: String,
    },

    #[error("Vault client error ({status}): {message}")]
    ClientError { status: u16, message: String },

    #[error("Vault request error: {0}")]
    RequestError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    pub(crate) fn auth_failed(method: AuthenticationMethod, message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            method,
            message: message.into(),
        }
    }
}
