//! Read-only host projections for operator-facing adapters.

use async_trait::async_trait;

use crate::error::Result;

use super::cluster::ClusterRequest;

/// Per-host result of a lenient lookup.
#[derive(Debug, Clone)]
pub struct HostLookup<T> {
    pub host: String,
    pub outcome: std::result::Result<T, String>,
}

/// Flags a docker CLI needs to talk to a host's engine.
#[derive(Debug, Clone)]
pub struct ConnectionFlags {
    pub ca_cert: Option<String>,
    pub client_cert: Option<String>,
    pub client_key: Option<String>,
    pub engine_url: String,
}

/// One listed container.
#[derive(Debug, Clone)]
pub struct ContainerRow {
    pub id: String,
    pub names: String,
    pub image: String,
    pub state: String,
    pub status: String,
    pub created: String,
}

/// Inspection use-cases.
#[async_trait]
pub trait InspectOperator: Send + Sync {
    /// Bare address of each host.
    async fn addresses(&self, request: &ClusterRequest) -> Result<Vec<HostLookup<String>>>;

    /// Engine URL of each host.
    async fn engine_urls(&self, request: &ClusterRequest) -> Result<Vec<HostLookup<String>>>;

    /// Full directory record of a host.
    async fn describe(&self, request: &ClusterRequest, host: &str) -> Result<serde_json::Value>;

    /// Connection flags of a host's engine.
    async fn connection_flags(&self, request: &ClusterRequest, host: &str)
        -> Result<ConnectionFlags>;

    /// All containers on a host.
    async fn containers(&self, request: &ClusterRequest, host: &str) -> Result<Vec<ContainerRow>>;

    /// Start the machine behind each host.
    async fn start_machines(&self, request: &ClusterRequest) -> Result<Vec<HostLookup<()>>>;
}
