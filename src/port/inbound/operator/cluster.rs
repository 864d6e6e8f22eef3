//! Cluster lifecycle projections for operator-facing adapters.
//!
//! Defines request and response types for the mutating commands: full
//! bootstrap, discovery-only bootstrap, teardown and registrar relaunch.

use async_trait::async_trait;

use crate::error::Result;

/// Hosts and configuration for one cluster command.
#[derive(Debug, Clone, Default)]
pub struct ClusterRequest {
    /// Raw TOML configuration content; defaults apply when absent.
    pub config_toml: Option<String>,

    /// Host names in operator order. The first one bootstraps discovery.
    pub hosts: Vec<String>,
}

/// A host that failed, with a printable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedHost {
    pub host: String,
    pub reason: String,
}

/// Outcome of forming the discovery quorum.
#[derive(Debug, Clone)]
pub struct QuorumSummary {
    pub cluster: String,
    pub bootstrap_host: String,
    pub quorum: usize,
    /// Hosts whose discovery agent started, bootstrap node first.
    pub joined: Vec<String>,
    pub discovery_url: String,
}

/// Outcome of a full cluster creation.
#[derive(Debug, Clone)]
pub struct CreateSummary {
    pub quorum: QuorumSummary,
    /// Hosts that received scheduler and registrar containers.
    pub provisioned: Vec<String>,
}

/// Removal result for one container name on one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalStatus {
    Removed,
    Absent,
    Failed(String),
}

/// Teardown result for one host.
#[derive(Debug, Clone)]
pub struct HostTeardown {
    pub host: String,
    pub containers: Vec<(String, RemovalStatus)>,
}

/// Outcome of a teardown across hosts.
#[derive(Debug, Clone, Default)]
pub struct TeardownSummary {
    pub hosts: Vec<HostTeardown>,
    /// Hosts that could not be reached at all.
    pub unreachable: Vec<FailedHost>,
}

/// Outcome of a lenient per-host fan-out.
#[derive(Debug, Clone, Default)]
pub struct FanOutSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedHost>,
}

/// Cluster lifecycle use-cases.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait ClusterOperator: Send + Sync {
    /// Form the discovery quorum, then launch dependent services.
    ///
    /// # Errors
    ///
    /// Fails when the bootstrap node cannot start discovery, when any joiner
    /// fails (no services are launched then), or when a service launch fails.
    async fn create(&self, request: &ClusterRequest) -> Result<CreateSummary>;

    /// Form the discovery quorum only.
    async fn consul(&self, request: &ClusterRequest) -> Result<QuorumSummary>;

    /// Remove every known service container from each host.
    ///
    /// Best effort: never fails because a container is absent or a host is
    /// unreachable; those appear in the summary instead.
    async fn destroy(&self, request: &ClusterRequest) -> Result<TeardownSummary>;

    /// Remove and relaunch the registrar on each host.
    async fn registrator(&self, request: &ClusterRequest) -> Result<FanOutSummary>;
}
