use crate::error::VaultError;
use std::fmt;
use std::time::{Duration, Instant};

/// Token issued by a successful login
#[derive(Clone)]
pub struct VaultToken {
    token: String,
    lease_duration: Duration,
    obtained_at: Instant,
}

impl VaultToken {
    pub fn new(token: impl Into<String>, lease_duration: Duration) -> Result<Self, VaultError> {
        let token = token.into();
        if token.is_empty() {
            return Err(VaultError::InvalidConfig("Token must not be empty".to_string()));
        }
        Ok(Self {
            token,
            lease_duration,
            obtained_at: Instant::now(),
        })
    }

    /// Static token (never expires)
    pub fn static_token(token: impl Into<String>) -> Result<Self, VaultError> {
        Self::new(token, Duration::ZERO)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn lease_duration(&self) -> Duration {
        self.lease_duration
    }

    pub fn lease_duration_secs(&self) -> u64 {
        self.lease_duration.as_secs()
    }

    pub fn obtained_at(&self) -> Instant {
        self.obtained_at
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        if self.lease_duration.is_zero() {
            return false;
        }
        self.obtained_at.elapsed() >= self.lease_duration
    }
}

impl PartialEq for VaultToken {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token && self.lease_duration == other.lease_duration
    }
}

impl Eq for VaultToken {}

impl fmt::Debug for VaultToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultToken")
            .field("token", &"***")
            .field("lease_duration", &self.lease_duration)
            .finish()
    }
}
