//! Resolved host endpoints and the membership record written back to hosts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub use super::id::HostId;

/// Client certificate material for a TLS-protected engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsMaterial {
    /// CA certificate used to verify the engine.
    pub ca_cert: PathBuf,
    /// Client certificate presented to the engine.
    pub client_cert: PathBuf,
    /// Private key of the client certificate.
    pub client_key: PathBuf,
}

/// Everything needed to reach one host's container engine.
///
/// Produced by the host directory; the engine URL is kept verbatim
/// (`tcp://10.0.0.5:2376`) and split once into address and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: HostId,
    url: String,
    address: String,
    port: u16,
    tls: Option<TlsMaterial>,
}

impl Endpoint {
    /// Parse an engine URL of the form `scheme://address:port`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidEngineUrl`] when the scheme separator,
    /// the address or a numeric port is missing.
    pub fn parse(
        host: HostId,
        url: impl Into<String>,
        tls: Option<TlsMaterial>,
    ) -> Result<Self, DomainError> {
        let url = url.into();
        let invalid = |reason| DomainError::InvalidEngineUrl {
            url: url.clone(),
            reason,
        };

        let (_, host_port) = url.split_once("://").ok_or_else(|| invalid("missing scheme"))?;
        let host_port = host_port.trim_end_matches('/');
        let (address, port) = host_port
            .rsplit_once(':')
            .ok_or_else(|| invalid("missing port"))?;
        if address.is_empty() {
            return Err(invalid("missing address"));
        }
        let port = port.parse::<u16>().map_err(|_| invalid("port is not a number"))?;

        Ok(Self {
            host,
            address: address.to_string(),
            port,
            url,
            tls,
        })
    }

    /// The host this endpoint belongs to.
    #[must_use]
    pub fn host(&self) -> &HostId {
        &self.host
    }

    /// The engine URL as stored in the directory.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bare host address (no port).
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Port the engine listens on.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// `address:port` of the engine itself.
    #[must_use]
    pub fn host_port(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// TLS material, if the engine requires it.
    #[must_use]
    pub fn tls(&self) -> Option<&TlsMaterial> {
        self.tls.as_ref()
    }
}

/// Swarm membership flags persisted into a host's directory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmMembership {
    /// Host participates in a swarm.
    pub is_swarm: bool,
    /// Host runs a swarm master.
    pub master: bool,
    /// Discovery backend URL the swarm uses.
    pub discovery: String,
}

impl SwarmMembership {
    /// Membership of a master node using the given discovery URL.
    #[must_use]
    pub fn master(discovery: impl Into<String>) -> Self {
        Self {
            is_swarm: true,
            master: true,
            discovery: discovery.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(url: &str) -> Result<Endpoint, DomainError> {
        Endpoint::parse(HostId::new("node-1"), url, None)
    }

    #[test]
    fn parse_splits_address_and_port() {
        let ep = endpoint("tcp://10.0.0.5:2376").unwrap();
        assert_eq!(ep.address(), "10.0.0.5");
        assert_eq!(ep.port(), 2376);
        assert_eq!(ep.host_port(), "10.0.0.5:2376");
        assert_eq!(ep.url(), "tcp://10.0.0.5:2376");
    }

    #[test]
    fn parse_rejects_missing_scheme() {
        assert!(matches!(
            endpoint("10.0.0.5:2376"),
            Err(DomainError::InvalidEngineUrl { reason: "missing scheme", .. })
        ));
    }

    #[test]
    fn parse_rejects_missing_port() {
        assert!(matches!(
            endpoint("tcp://10.0.0.5"),
            Err(DomainError::InvalidEngineUrl { reason: "missing port", .. })
        ));
    }

    #[test]
    fn parse_rejects_bad_port() {
        assert!(endpoint("tcp://10.0.0.5:docker").is_err());
    }

    #[test]
    fn master_membership_sets_both_flags() {
        let m = SwarmMembership::master("consul://10.0.0.5:8500/barney");
        assert!(m.is_swarm);
        assert!(m.master);
        assert_eq!(m.discovery, "consul://10.0.0.5:8500/barney");
    }
}
