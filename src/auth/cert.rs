use super::{AuthMethod, VaultToken, login};
use crate::VaultError;
use crate::client::VaultClient;
use crate::properties::{AuthenticationMethod, CertSettings};
use async_trait::async_trait;

/// TLS certificate authentication.
///
/// The client certificate is presented by the transport during the TLS
/// handshake, so the login body is empty.
pub struct CertAuth {
    settings: CertSettings,
}

impl CertAuth {
    pub fn new(settings: CertSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl AuthMethod for CertAuth {
    fn method(&self) -> AuthenticationMethod {
        AuthenticationMethod::Cert
    }

    async fn login(&self, client: &VaultClient) -> Result<VaultToken, VaultError> {
        tracing::info!("Using TLS Certificate authentication to log into Vault");

        let payload = serde_json::json!({});
        let response =
            login::submit(client, self.method(), &self.settings.cert_auth_path, &payload).await?;
        let token = response.token(self.method())?;

        tracing::debug!("Login successful using TLS certificates");
        Ok(token)
    }
}
