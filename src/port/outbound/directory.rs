//! Host directory port.
//!
//! The directory owns the inventory of machines: it turns a host name into
//! an engine endpoint with credentials and stores per-host records. The
//! orchestrator never touches that storage directly.

use async_trait::async_trait;

use crate::domain::host::{Endpoint, HostId, SwarmMembership};
use crate::error::Result;

/// Inventory of machines and their connection material.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; fan-out may resolve several hosts
/// concurrently. No two calls ever write the same host's record at once.
#[async_trait]
pub trait HostDirectory: Send + Sync {
    /// Resolve a host's engine endpoint and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolution`](crate::error::Error::Resolution) when the
    /// host is unknown or its record is incomplete.
    async fn resolve(&self, host: &HostId) -> Result<Endpoint>;

    /// Write swarm membership into the host's record and save it.
    ///
    /// Every other field of the record is left untouched.
    async fn persist_membership(&self, host: &HostId, membership: &SwarmMembership)
        -> Result<()>;

    /// The host's full record, for display.
    async fn describe(&self, host: &HostId) -> Result<serde_json::Value>;

    /// Start the machine backing the host.
    async fn start_machine(&self, host: &HostId) -> Result<()>;
}
