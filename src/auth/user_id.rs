use crate::error::VaultError;
use sha2::{Digest, Sha256};
use std::net::{IpAddr, ToSocketAddrs};

/// Source of the `user_id` half of an AppId login
pub trait AppIdUserIdMechanism: Send + Sync {
    fn create_user_id(&self) -> String;
}

/// Fixed, configured user id
#[derive(Debug, Clone)]
pub struct StaticUserId {
    user_id: String,
}

impl StaticUserId {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl AppIdUserIdMechanism for StaticUserId {
    fn create_user_id(&self) -> String {
        self.user_id.clone()
    }
}

/// Hex SHA-256 of the host's IP address
#[derive(Debug, Clone)]
pub struct IpAddressUserId {
    address: IpAddr,
}

impl IpAddressUserId {
    /// Resolves the local hostname to an address, preferring IPv4
    pub fn new() -> Result<Self, VaultError> {
        let hostname = gethostname::gethostname();
        let hostname = hostname.to_string_lossy();

        let addresses: Vec<IpAddr> = (&*hostname, 0u16)
            .to_socket_addrs()
            .map_err(|e| {
                VaultError::InvalidConfig(format!("Cannot resolve host {}: {}", hostname, e))
            })?
            .map(|addr| addr.ip())
            .collect();

        addresses
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addresses.first())
            .map(|ip| Self::with_address(*ip))
            .ok_or_else(|| VaultError::InvalidConfig(format!("No address for host {}", hostname)))
    }

    pub fn with_address(address: IpAddr) -> Self {
        Self { address }
    }
}

impl AppIdUserIdMechanism for IpAddressUserId {
    fn create_user_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.address.to_string());
        format!("{:x}", hasher.finalize())
    }
}
