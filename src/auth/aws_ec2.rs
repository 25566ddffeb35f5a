use super::{AuthMethod, VaultToken, login};
use crate::VaultError;
use crate::client::{VaultClient, error_message};
use crate::properties::{AuthenticationMethod, AwsEc2Settings};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::OnceLock;
use uuid::Uuid;

/// AWS-EC2 authentication using the instance's PKCS#7 identity document
pub struct AwsEc2Auth {
    settings: AwsEc2Settings,
    // at most one nonce per instance, reused by every login
    nonce: OnceLock<String>,
}

#[derive(Debug, Default, Serialize)]
struct Ec2Login {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pkcs7: Option<String>,
}

/// Removes carriage returns, newlines and literal `\n` escapes from an identity document
pub fn sanitize_pkcs7(document: &str) -> String {
    document
        .replace("\\n", "")
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect()
}

impl AwsEc2Auth {
    pub fn new(settings: AwsEc2Settings) -> Self {
        Self {
            settings,
            nonce: OnceLock::new(),
        }
    }

    /// Nonce sent with every login, created on first use
    pub fn nonce(&self) -> &str {
        self.nonce.get_or_init(|| Uuid::new_v4().to_string())
    }

    async fn fetch_identity_document(&self, client: &VaultClient) -> Result<String, VaultError> {
        let raw = client
            .transport()
            .get(&self.settings.identity_document, None)
            .await
            .map_err(|e| login::attempted(self.method(), e))?;

        if !raw.is_success() {
            return Err(VaultError::auth_failed(
                self.method(),
                format!(
                    "Cannot obtain identity document from {} ({}): {}",
                    self.settings.identity_document,
                    raw.status,
                    error_message(&raw)
                ),
            ));
        }

        Ok(raw.body)
    }

    async fn login_payload(&self, client: &VaultClient) -> Result<serde_json::Value, VaultError> {
        let mut login = Ec2Login {
            role: self
                .settings
                .role
                .clone()
                .filter(|role| !role.trim().is_empty()),
            ..Ec2Login::default()
        };

        if self.settings.use_nonce {
            login.nonce = Some(self.nonce().to_string());
        }

        let document = self.fetch_identity_document(client).await?;
        let pkcs7 = sanitize_pkcs7(&document);
        if !pkcs7.trim().is_empty() {
            login.pkcs7 = Some(pkcs7);
        }

        Ok(serde_json::to_value(login)?)
    }
}

#[async_trait]
impl AuthMethod for AwsEc2Auth {
    fn method(&self) -> AuthenticationMethod {
        AuthenticationMethod::AwsEc2
    }

    async fn login(&self, client: &VaultClient) -> Result<VaultToken, VaultError> {
        tracing::info!("Using AWS-EC2 authentication to log into Vault");

        let payload = self.login_payload(client).await?;
        let response =
            login::submit(client, self.method(), &self.settings.aws_ec2_path, &payload).await?;
        let token = response.token(self.method())?;

        match response.metadata_str("instance_id") {
            Some(instance_id) => tracing::debug!(
                instance_id,
                ami_id = response.metadata_str("ami_id"),
                "Login successful using AWS-EC2 authentication"
            ),
            None => tracing::debug!("Login successful using AWS-EC2 authentication"),
        }

        Ok(token)
    }
}
