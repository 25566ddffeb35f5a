use super::{AppIdUserIdMechanism, AuthMethod, VaultToken, login};
use crate::VaultError;
use crate::client::VaultClient;
use crate::properties::{AppIdSettings, AuthenticationMethod};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// AppId authentication
pub struct AppIdAuth {
    settings: AppIdSettings,
    user_id: Arc<dyn AppIdUserIdMechanism>,
}

#[derive(Debug, Serialize)]
struct AppIdLogin {
    app_id: String,
    user_id: String,
}

impl AppIdAuth {
    pub fn new(settings: AppIdSettings, user_id: Arc<dyn AppIdUserIdMechanism>) -> Self {
        Self { settings, user_id }
    }

    fn login_payload(&self) -> Result<serde_json::Value, VaultError> {
        let login = AppIdLogin {
            app_id: self.settings.app_id.clone(),
            user_id: self.user_id.create_user_id(),
        };
        Ok(serde_json::to_value(login)?)
    }
}

#[async_trait]
impl AuthMethod for AppIdAuth {
    fn method(&self) -> AuthenticationMethod {
        AuthenticationMethod::AppId
    }

    async fn login(&self, client: &VaultClient) -> Result<VaultToken, VaultError> {
        tracing::info!("Using AppId authentication to log into Vault");

        let payload = self.login_payload()?;
        let response =
            login::submit(client, self.method(), &self.settings.app_id_path, &payload).await?;
        let token = response.token(self.method())?;

        tracing::debug!("Login successful using AppId authentication");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticUserId;
    use serde_json::json;

    #[test]
    fn test_payload_has_exactly_app_id_and_user_id() {
        let auth = AppIdAuth::new(
            AppIdSettings {
                app_id_path: "app-id".to_string(),
                app_id: "billing".to_string(),
            },
            Arc::new(StaticUserId::new("user-42")),
        );

        let payload = auth.login_payload().unwrap();
        assert_eq!(payload, json!({"app_id": "billing", "user_id": "user-42"}));
    }
}
