use crate::error::VaultError;
use std::fmt;
use std::str::FromStr;

const DEFAULT_SCHEME: &str = "https";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8200;
const DEFAULT_APPLICATION_NAME: &str = "application";
const DEFAULT_APP_ID_PATH: &str = "app-id";
const DEFAULT_CERT_AUTH_PATH: &str = "cert";
const DEFAULT_AWS_EC2_PATH: &str = "aws-ec2";
const DEFAULT_IDENTITY_DOCUMENT: &str =
    "http://169.254.169.254/latest/dynamic/instance-identity/pkcs7";

/// Supported Vault login methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticationMethod {
    Token,
    AppId,
    Cert,
    AwsEc2,
}

impl AuthenticationMethod {
    /// Human readable name used in login failures
    pub fn description(&self) -> &'static str {
        match self {
            Self::Token => "static token",
            Self::AppId => "app-id",
            Self::Cert => "TLS certificates",
            Self::AwsEc2 => "AWS-EC2",
        }
    }
}

impl fmt::Display for AuthenticationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Token => "TOKEN",
            Self::AppId => "APPID",
            Self::Cert => "CERT",
            Self::AwsEc2 => "AWS_EC2",
        };
        f.write_str(tag)
    }
}

impl FromStr for AuthenticationMethod {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match normalized.as_str() {
            "TOKEN" => Ok(Self::Token),
            "APPID" => Ok(Self::AppId),
            "CERT" => Ok(Self::Cert),
            "AWSEC2" => Ok(Self::AwsEc2),
            _ => Err(VaultError::UnsupportedMethod {
                method: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdSettings {
    pub app_id_path: String,
    pub app_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertSettings {
    pub cert_auth_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsEc2Settings {
    pub aws_ec2_path: String,
    pub role: Option<String>,
    pub identity_document: String,
    pub use_nonce: bool,
}

impl Default for AwsEc2Settings {
    fn default() -> Self {
        Self {
            aws_ec2_path: DEFAULT_AWS_EC2_PATH.to_string(),
            role: None,
            identity_document: DEFAULT_IDENTITY_DOCUMENT.to_string(),
            use_nonce: true,
        }
    }
}

/// Method-specific login settings, one variant per [`AuthenticationMethod`]
#[derive(Clone, PartialEq, Eq)]
pub enum AuthSettings {
    Token { token: String },
    AppId(AppIdSettings),
    Cert(CertSettings),
    AwsEc2(AwsEc2Settings),
}

impl AuthSettings {
    pub fn method(&self) -> AuthenticationMethod {
        match self {
            Self::Token { .. } => AuthenticationMethod::Token,
            Self::AppId(_) => AuthenticationMethod::AppId,
            Self::Cert(_) => AuthenticationMethod::Cert,
            Self::AwsEc2(_) => AuthenticationMethod::AwsEc2,
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { .. } => f.debug_struct("Token").field("token", &"***").finish(),
            Self::AppId(settings) => f.debug_tuple("AppId").field(settings).finish(),
            Self::Cert(settings) => f.debug_tuple("Cert").field(settings).finish(),
            Self::AwsEc2(settings) => f.debug_tuple("AwsEc2").field(settings).finish(),
        }
    }
}

/// Location of the Vault server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Default for VaultEndpoint {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl VaultEndpoint {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct VaultProperties {
    pub endpoint: VaultEndpoint,
    pub application_name: String,
    pub authentication: AuthSettings,
}

impl VaultProperties {
    pub fn builder() -> VaultPropertiesBuilder {
        VaultPropertiesBuilder::new()
    }
}

#[derive(Default)]
pub struct VaultPropertiesBuilder {
    scheme: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    token: Option<String>,
    application_name: Option<String>,
    authentication: Option<String>,
    app_id_path: Option<String>,
    cert_auth_path: Option<String>,
    aws_ec2_path: Option<String>,
    aws_ec2_role: Option<String>,
    identity_document: Option<String>,
    use_nonce: Option<bool>,
}

impl VaultPropertiesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Method tag, e.g. `TOKEN`, `APPID`, `CERT` or `AWS_EC2`
    pub fn authentication(mut self, method: impl Into<String>) -> Self {
        self.authentication = Some(method.into());
        self
    }

    pub fn app_id_path(mut self, path: impl Into<String>) -> Self {
        self.app_id_path = Some(path.into());
        self
    }

    pub fn cert_auth_path(mut self, path: impl Into<String>) -> Self {
        self.cert_auth_path = Some(path.into());
        self
    }

    pub fn aws_ec2_path(mut self, path: impl Into<String>) -> Self {
        self.aws_ec2_path = Some(path.into());
        self
    }

    pub fn aws_ec2_role(mut self, role: impl Into<String>) -> Self {
        self.aws_ec2_role = Some(role.into());
        self
    }

    pub fn identity_document(mut self, url: impl Into<String>) -> Self {
        self.identity_document = Some(url.into());
        self
    }

    pub fn use_nonce(mut self, use_nonce: bool) -> Self {
        self.use_nonce = Some(use_nonce);
        self
    }

    fn resolve_endpoint(
        &self,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Result<VaultEndpoint, VaultError> {
        let scheme = self
            .scheme
            .clone()
            .or_else(|| env("VAULT_SCHEME"))
            .unwrap_or_else(|| DEFAULT_SCHEME.to_string());

        let host = self
            .host
            .clone()
            .or_else(|| env("VAULT_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match self.port {
            Some(port) => port,
            None => match env("VAULT_PORT") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| VaultError::InvalidConfig(format!("Invalid VAULT_PORT: {}", raw)))?,
                None => DEFAULT_PORT,
            },
        };

        Ok(VaultEndpoint { scheme, host, port })
    }

    /// Resolves unset fields from `VAULT_*` environment variables, then defaults
    pub fn build(self) -> Result<VaultProperties, VaultError> {
        self.build_with_env(|key| std::env::var(key).ok())
    }

    fn build_with_env(
        self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<VaultProperties, VaultError> {
        let endpoint = self.resolve_endpoint(&env)?;

        let application_name = self
            .application_name
            .clone()
            .or_else(|| env("VAULT_APPLICATION_NAME"))
            .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string());

        let method: AuthenticationMethod = self
            .authentication
            .clone()
            .or_else(|| env("VAULT_AUTHENTICATION"))
            .map(|tag| tag.parse::<AuthenticationMethod>())
            .transpose()?
            .unwrap_or(AuthenticationMethod::Token);

        let authentication = match method {
            AuthenticationMethod::Token => {
                let token = self
                    .token
                    .or_else(|| env("VAULT_TOKEN"))
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| {
                        VaultError::InvalidConfig("Token authentication requires a token".to_string())
                    })?;
                AuthSettings::Token { token }
            }
            AuthenticationMethod::AppId => AuthSettings::AppId(AppIdSettings {
                app_id_path: self
                    .app_id_path
                    .unwrap_or_else(|| DEFAULT_APP_ID_PATH.to_string()),
                app_id: application_name.clone(),
            }),
            AuthenticationMethod::Cert => AuthSettings::Cert(CertSettings {
                cert_auth_path: self
                    .cert_auth_path
                    .unwrap_or_else(|| DEFAULT_CERT_AUTH_PATH.to_string()),
            }),
            AuthenticationMethod::AwsEc2 => {
                let defaults = AwsEc2Settings::default();
                AuthSettings::AwsEc2(AwsEc2Settings {
                    aws_ec2_path: self.aws_ec2_path.unwrap_or(defaults.aws_ec2_path),
                    role: self
                        .aws_ec2_role
                        .or_else(|| env("VAULT_AWS_EC2_ROLE"))
                        .filter(|r| !r.trim().is_empty()),
                    identity_document: self
                        .identity_document
                        .unwrap_or(defaults.identity_document),
                    use_nonce: self.use_nonce.unwrap_or(defaults.use_nonce),
                })
            }
        };

        Ok(VaultProperties {
            endpoint,
            application_name,
            authentication,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_method_tags() {
        assert_eq!("TOKEN".parse::<AuthenticationMethod>().unwrap(), AuthenticationMethod::Token);
        assert_eq!("app-id".parse::<AuthenticationMethod>().unwrap(), AuthenticationMethod::AppId);
        assert_eq!("AppId".parse::<AuthenticationMethod>().unwrap(), AuthenticationMethod::AppId);
        assert_eq!("cert".parse::<AuthenticationMethod>().unwrap(), AuthenticationMethod::Cert);
        assert_eq!("aws_ec2".parse::<AuthenticationMethod>().unwrap(), AuthenticationMethod::AwsEc2);
        assert_eq!("AWS-EC2".parse::<AuthenticationMethod>().unwrap(), AuthenticationMethod::AwsEc2);
    }

    #[test]
    fn test_parse_unknown_method_names_value() {
        let err = "kerberos".parse::<AuthenticationMethod>().unwrap_err();
        match err {
            VaultError::UnsupportedMethod { method } => assert_eq!(method, "kerberos"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for method in [
            AuthenticationMethod::Token,
            AuthenticationMethod::AppId,
            AuthenticationMethod::Cert,
            AuthenticationMethod::AwsEc2,
        ] {
            assert_eq!(method.to_string().parse::<AuthenticationMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_builder_aws_ec2_defaults() {
        let props = VaultProperties::builder()
            .host("vault")
            .port(8200)
            .scheme("http")
            .authentication("AWS_EC2")
            .aws_ec2_role("")
            .build()
            .unwrap();

        assert_eq!(props.endpoint, VaultEndpoint::new("http", "vault", 8200));
        match props.authentication {
            AuthSettings::AwsEc2(settings) => {
                assert_eq!(settings.aws_ec2_path, "aws-ec2");
                assert_eq!(settings.role, None);
                assert!(settings.use_nonce);
                assert_eq!(settings.identity_document, DEFAULT_IDENTITY_DOCUMENT);
            }
            other => panic!("unexpected settings: {other:?}"),
        }
    }

    #[test]
    fn test_builder_app_id_uses_application_name() {
        let props = VaultProperties::builder()
            .authentication("APPID")
            .application_name("billing")
            .app_id_path("custom-app-id")
            .build()
            .unwrap();

        assert_eq!(
            props.authentication,
            AuthSettings::AppId(AppIdSettings {
                app_id_path: "custom-app-id".to_string(),
                app_id: "billing".to_string(),
            })
        );
        assert_eq!(props.authentication.method(), AuthenticationMethod::AppId);
    }

    #[test]
    fn test_builder_rejects_unknown_method() {
        let result = VaultProperties::builder().authentication("kerberos").build();
        assert!(matches!(result, Err(VaultError::UnsupportedMethod { .. })));
    }

    fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_fallbacks() {
        let props = VaultProperties::builder()
            .build_with_env(env_from(&[
                ("VAULT_SCHEME", "http"),
                ("VAULT_HOST", "vault.internal"),
                ("VAULT_PORT", " 8300 "),
                ("VAULT_APPLICATION_NAME", "billing"),
                ("VAULT_AUTHENTICATION", "aws-ec2"),
                ("VAULT_AWS_EC2_ROLE", "prod"),
            ]))
            .unwrap();

        assert_eq!(props.endpoint, VaultEndpoint::new("http", "vault.internal", 8300));
        assert_eq!(props.application_name, "billing");
        match props.authentication {
            AuthSettings::AwsEc2(settings) => assert_eq!(settings.role.as_deref(), Some("prod")),
            other => panic!("unexpected settings: {other:?}"),
        }
    }

    #[test]
    fn test_builder_values_override_env() {
        let props = VaultProperties::builder()
            .host("explicit")
            .port(9000)
            .token("from-builder")
            .build_with_env(env_from(&[
                ("VAULT_HOST", "from-env"),
                ("VAULT_PORT", "not-a-port"),
                ("VAULT_TOKEN", "env-token"),
            ]))
            .unwrap();

        assert_eq!(props.endpoint.host, "explicit");
        assert_eq!(props.endpoint.port, 9000);
        assert_eq!(
            props.authentication,
            AuthSettings::Token {
                token: "from-builder".to_string()
            }
        );
    }

    #[test]
    fn test_defaults_without_env() {
        let props = VaultProperties::builder()
            .build_with_env(env_from(&[("VAULT_TOKEN", "env-token")]))
            .unwrap();

        assert_eq!(props.endpoint, VaultEndpoint::default());
        assert_eq!(props.application_name, DEFAULT_APPLICATION_NAME);
        assert_eq!(props.authentication.method(), AuthenticationMethod::Token);
    }

    #[test]
    fn test_invalid_env_port_rejected() {
        let result = VaultProperties::builder()
            .token("t")
            .build_with_env(env_from(&[("VAULT_PORT", "eighty")]));
        match result {
            Err(VaultError::InvalidConfig(message)) => assert!(message.contains("eighty")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_env_method_rejected() {
        let result = VaultProperties::builder()
            .build_with_env(env_from(&[("VAULT_AUTHENTICATION", "ldap")]));
        match result {
            Err(VaultError::UnsupportedMethod { method }) => assert_eq!(method, "ldap"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_debug_masks_token() {
        let props = VaultProperties::builder()
            .authentication("TOKEN")
            .token("s.super-secret-root")
            .build_with_env(env_from(&[]))
            .unwrap();

        let rendered = format!("{:?}", props);
        assert!(!rendered.contains("super-secret"), "{rendered}");
        assert!(rendered.contains("Token"));
    }

    #[test]
    fn test_builder_token_method_requires_token() {

        let result = VaultProperties::builder()
            .authentication("token")
            .token("  ")
            .build();
        assert!(matches!(result, Err(VaultError::InvalidConfig(_))));
    }
}
