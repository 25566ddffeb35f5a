//! vault-auth - logs a process into HashiCorp Vault
//!
//! One method is selected from configuration and run per login:
//! 1. TOKEN → configured static token, no request
//! 2. APPID → `auth/{app-id path}/login` with `app_id` + `user_id`
//! 3. CERT → `auth/{cert path}/login`, client certificate presented by the transport
//! 4. AWS_EC2 → `auth/{aws-ec2 path}/login` with role, nonce and the PKCS#7 identity document

pub mod auth;
mod client;
mod error;
mod models;
mod properties;
mod transport;

#[cfg(test)]
mod testing;

pub use auth::{
    AppIdUserIdMechanism, AuthMethod, ClientAuthentication, IpAddressUserId, LoginResponse,
    StaticUserId, VaultToken,
};
pub use client::{API_VERSION, VaultClient, VaultClientResponse, error_message};
pub use error::VaultError;
pub use models::{AuthData, VaultHealthResponse, VaultResponse, VaultSealStatusResponse};
pub use properties::{
    AppIdSettings, AuthSettings, AuthenticationMethod, AwsEc2Settings, CertSettings,
    VaultEndpoint, VaultProperties, VaultPropertiesBuilder,
};
pub use transport::{RawResponse, ReqwestTransport, Transport, VAULT_TOKEN_HEADER};
