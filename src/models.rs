use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Generic Vault response envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub lease_id: Option<String>,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub data: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub auth: Option<AuthData>,
}

/// `auth` block of a login response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthData {
    #[serde(default)]
    pub client_token: Option<String>,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub policies: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Body of `sys/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultHealthResponse {
    pub initialized: bool,
    pub sealed: bool,
    #[serde(default)]
    pub standby: bool,
    #[serde(default)]
    pub server_time_utc: i64,
    #[serde(default)]
    pub version: Option<String>,
}

/// Body of `sys/seal-status` and `sys/unseal`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSealStatusResponse {
    pub sealed: bool,
    /// Unseal threshold
    #[serde(rename = "t", default)]
    pub secret_threshold: u32,
    /// Number of key shares
    #[serde(rename = "n", default)]
    pub secret_shares: u32,
    #[serde(default)]
    pub progress: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_deserialize() {
        let json = r#"{
            "request_id": "abc",
            "lease_duration": 0,
            "renewable": false,
            "data": null,
            "auth": {
                "client_token": "tok-1",
                "lease_duration": 3600,
                "renewable": true,
                "policies": ["default"],
                "metadata": {"instance_id": "i-1234", "ami_id": "ami-5678"}
            }
        }"#;
        let resp: VaultResponse = serde_json::from_str(json).unwrap();
        let auth = resp.auth.unwrap();
        assert_eq!(auth.client_token.as_deref(), Some("tok-1"));
        assert_eq!(auth.lease_duration, 3600);
        let metadata = auth.metadata.unwrap();
        assert_eq!(metadata["instance_id"], serde_json::json!("i-1234"));
    }

    #[test]
    fn test_auth_optional_fields() {
        let resp: VaultResponse = serde_json::from_str(r#"{"auth": {}}"#).unwrap();
        let auth = resp.auth.unwrap();
        assert!(auth.client_token.is_none());
        assert_eq!(auth.lease_duration, 0);
        assert!(auth.metadata.is_none());
    }

    #[test]
    fn test_seal_status_deserialize() {
        let json = r#"{"sealed": true, "t": 3, "n": 5, "progress": 1}"#;
        let status: VaultSealStatusResponse = serde_json::from_str(json).unwrap();
        assert!(status.sealed);
        assert_eq!(status.secret_threshold, 3);
        assert_eq!(status.secret_shares, 5);
        assert_eq!(status.progress, 1);
    }
}
