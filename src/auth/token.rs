use super::{AuthMethod, VaultToken};
use crate::VaultError;
use crate::client::VaultClient;
use crate::properties::AuthenticationMethod;
use async_trait::async_trait;

/// Static token authentication
pub struct StaticTokenAuth {
    token: String,
}

impl StaticTokenAuth {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AuthMethod for StaticTokenAuth {
    fn method(&self) -> AuthenticationMethod {
        AuthenticationMethod::Token
    }

    async fn login(&self, _client: &VaultClient) -> Result<VaultToken, VaultError> {
        tracing::info!("Using static token to access Vault");
        VaultToken::static_token(self.token.clone())
    }
}
