mod app_id;
mod aws_ec2;
mod cert;
mod login;
mod token;
mod user_id;
mod vault_token;

pub use app_id::AppIdAuth;
pub use aws_ec2::{AwsEc2Auth, sanitize_pkcs7};
pub use cert::CertAuth;
pub use login::LoginResponse;
pub use token::StaticTokenAuth;
pub use user_id::{AppIdUserIdMechanism, IpAddressUserId, StaticUserId};
pub use vault_token::VaultToken;

use crate::client::VaultClient;
use crate::error::VaultError;
use crate::properties::{AuthSettings, AuthenticationMethod, VaultProperties};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for authentication methods
#[async_trait]
pub trait AuthMethod: Send + Sync {
    fn method(&self) -> AuthenticationMethod;

    /// Perform a single login against Vault
    async fn login(&self, client: &VaultClient) -> Result<VaultToken, VaultError>;
}

/// Logs into Vault with the configured method.
///
/// The method is selected once, at construction. Each [`login`](Self::login)
/// runs exactly that method; there is no fallback to another one.
pub struct ClientAuthentication {
    client: VaultClient,
    auth_method: Box<dyn AuthMethod>,
}

impl ClientAuthentication {
    /// Selects the method from `properties`. AppId needs a user id mechanism,
    /// use [`with_user_id_mechanism`](Self::with_user_id_mechanism) for it.
    pub fn new(properties: &VaultProperties, client: VaultClient) -> Result<Self, VaultError> {
        Self::select(&properties.authentication, client, None)
    }

    pub fn with_user_id_mechanism(
        properties: &VaultProperties,
        client: VaultClient,
        user_id: Arc<dyn AppIdUserIdMechanism>,
    ) -> Result<Self, VaultError> {
        Self::select(&properties.authentication, client, Some(user_id))
    }

    /// Reqwest-backed client pointed at the configured endpoint
    pub fn from_properties(properties: &VaultProperties) -> Result<Self, VaultError> {
        let client = VaultClient::with_reqwest(properties.endpoint.clone());
        Self::new(properties, client)
    }

    fn select(
        settings: &AuthSettings,
        client: VaultClient,
        user_id: Option<Arc<dyn AppIdUserIdMechanism>>,
    ) -> Result<Self, VaultError> {
        let auth_method: Box<dyn AuthMethod> = match settings {
            AuthSettings::Token { token } => Box::new(StaticTokenAuth::new(token.clone())),
            AuthSettings::AppId(app_id) => {
                let user_id = user_id.ok_or_else(|| VaultError::UnsupportedMethod {
                    method: format!("{} (no user id mechanism configured)", settings.method()),
                })?;
                Box::new(AppIdAuth::new(app_id.clone(), user_id))
            }
            AuthSettings::Cert(cert) => Box::new(CertAuth::new(cert.clone())),
            AuthSettings::AwsEc2(aws_ec2) => Box::new(AwsEc2Auth::new(aws_ec2.clone())),
        };

        Ok(Self {
            client,
            auth_method,
        })
    }

    pub fn method(&self) -> AuthenticationMethod {
        self.auth_method.method()
    }

    pub fn client(&self) -> &VaultClient {
        &self.client
    }

    pub async fn login(&self) -> Result<VaultToken, VaultError> {
        self.auth_method.login(&self.client).await
    }
}
