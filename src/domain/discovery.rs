//! Discovery quorum math and the URLs nodes use to find each other.
//!
//! Two addresses are derived from the bootstrap node:
//!
//! - the **join address** (`<address>:<cluster-port>`) that joiner discovery
//!   agents contact to enter the quorum, and
//! - the **backend URL** (`<scheme>://<address>:<backend-port>/<cluster>`)
//!   that dependent services use to read and write cluster state.
//!
//! Both are pure functions of the bootstrap address and the topology; they
//! are recomputed rather than stored.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Default cluster name scoping the discovery namespace.
pub const DEFAULT_CLUSTER_NAME: &str = "barney";

/// Default discovery backend scheme.
pub const DEFAULT_SCHEME: &str = "consul";

/// Default discovery HTTP API / backend port.
pub const DEFAULT_BACKEND_PORT: u16 = 8500;

/// Default discovery cluster (LAN gossip) port used for joins.
pub const DEFAULT_CLUSTER_PORT: u16 = 8301;

/// Number of discovery servers that must be present before the quorum
/// elects a leader: `floor(n / 2) + 1`.
///
/// Always computed from the full host list of a run, never from the set of
/// hosts that happened to succeed.
#[must_use]
pub const fn quorum_size(host_count: usize) -> usize {
    host_count / 2 + 1
}

/// Cluster name shared by every node of one bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClusterName(String);

impl ClusterName {
    /// Validate and wrap a cluster name.
    ///
    /// # Errors
    ///
    /// Names must be non-empty and must not contain `/` or whitespace, since
    /// they become the last path segment of the backend URL.
    pub fn try_new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("must not be empty")
        } else if name.contains('/') {
            Some("must not contain '/'")
        } else if name.chars().any(char::is_whitespace) {
            Some("must not contain whitespace")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidClusterName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClusterName {
    fn default() -> Self {
        Self(DEFAULT_CLUSTER_NAME.to_string())
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClusterName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ClusterName> for String {
    fn from(value: ClusterName) -> Self {
        value.0
    }
}

/// Ports and naming of the discovery service for one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryTopology {
    /// Cluster namespace.
    pub cluster: ClusterName,
    /// Backend URL scheme understood by dependent services.
    pub scheme: String,
    /// Discovery HTTP API port.
    pub backend_port: u16,
    /// Discovery gossip port used by joiners.
    pub cluster_port: u16,
}

impl Default for DiscoveryTopology {
    fn default() -> Self {
        Self {
            cluster: ClusterName::default(),
            scheme: DEFAULT_SCHEME.to_string(),
            backend_port: DEFAULT_BACKEND_PORT,
            cluster_port: DEFAULT_CLUSTER_PORT,
        }
    }
}

impl DiscoveryTopology {
    /// Address joiners pass to `-join`.
    #[must_use]
    pub fn join_address(&self, bootstrap_address: &str) -> String {
        format!("{bootstrap_address}:{}", self.cluster_port)
    }

    /// Backend URL dependent services use to find the cluster.
    #[must_use]
    pub fn backend_url(&self, address: &str) -> String {
        format!(
            "{}://{address}:{}/{}",
            self.scheme, self.backend_port, self.cluster
        )
    }

    /// Backend URL of the discovery agent running on the same host.
    #[must_use]
    pub fn local_backend_url(&self) -> String {
        format!("{}://localhost:{}", self.scheme, self.backend_port)
    }
}
