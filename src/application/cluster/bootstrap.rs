//! Discovery quorum formation.
//!
//! The first host is the bootstrap node: its discovery agent is started in
//! server mode expecting `quorum_size(hosts.len())` peers. Any failure up to
//! that point aborts the run before another host is contacted. The other
//! hosts then join through the bootstrap node's cluster address; a failed
//! joiner is logged and left out of the member set while the rest carry on.
//!
//! ```text
//! hosts[0] ──open──► run discovery (-bootstrap-expect q) ──► join address
//!                                                              │
//! hosts[1..] ──fleet──► run discovery (-join addr) ◄───────────┘
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::connection::Connection;
use crate::application::fleet::Fleet;
use crate::domain::discovery::quorum_size;
use crate::domain::host::HostId;
use crate::domain::role::DISCOVERY_CONTAINER;
use crate::domain::service::ServiceCatalog;
use crate::error::{Error, HostFailure, Result};

/// A quorum where every host joined.
#[derive(Debug)]
pub struct FormedQuorum {
    pub quorum: usize,
    /// Every host, bootstrap node first.
    pub members: Vec<Connection>,
    /// Backend URL on the bootstrap node, shared by dependent services.
    pub discovery_url: String,
}

/// Result of a quorum run that got past the bootstrap node.
#[derive(Debug)]
pub struct QuorumOutcome {
    /// Advertised quorum, computed from the full host list.
    pub quorum: usize,
    /// Number of hosts given.
    pub expected: usize,
    /// Hosts whose discovery agent started, bootstrap node first.
    pub members: Vec<Connection>,
    /// Joiners that failed to resolve or start.
    pub failures: Vec<(HostId, Error)>,
    pub join_address: String,
    pub discovery_url: String,
}

impl QuorumOutcome {
    /// True when every given host joined.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn bootstrap(&self) -> &Connection {
        &self.members[0]
    }

    /// Require that every host joined.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteQuorum`] when any joiner failed, even
    /// though a degraded quorum may be running.
    pub fn into_formed(self) -> Result<FormedQuorum> {
        if !self.is_complete() {
            return Err(Error::IncompleteQuorum {
                joined: self.members.len(),
                expected: self.expected,
                failures: self
                    .failures
                    .into_iter()
                    .map(|(host, error)| HostFailure {
                        host,
                        reason: error.to_string(),
                    })
                    .collect(),
            });
        }
        Ok(FormedQuorum {
            quorum: self.quorum,
            members: self.members,
            discovery_url: self.discovery_url,
        })
    }
}

/// Starts discovery agents on a host list.
pub struct QuorumBootstrapper {
    catalog: Arc<ServiceCatalog>,
    fleet: Fleet,
}

impl QuorumBootstrapper {
    #[must_use]
    pub fn new(catalog: Arc<ServiceCatalog>, fleet: Fleet) -> Self {
        Self { catalog, fleet }
    }

    /// Start the bootstrap node, then every joiner.
    ///
    /// # Errors
    ///
    /// [`Error::NoHosts`] for an empty list. Resolution, transport or
    /// creation errors on the bootstrap node are returned as is; joiner
    /// failures are reported in the outcome instead.
    pub async fn form(&self, hosts: &[HostId]) -> Result<QuorumOutcome> {
        let (first, joiners) = hosts.split_first().ok_or(Error::NoHosts)?;
        let quorum = quorum_size(hosts.len());
        let topology = &self.catalog.topology;

        let bootstrap = self.fleet.connector().open(first).await?;
        let spec = self.catalog.discovery_bootstrap(bootstrap.address(), quorum);
        bootstrap.run_image(DISCOVERY_CONTAINER, &spec).await?;

        let join_address = topology.join_address(bootstrap.address());
        let discovery_url = bootstrap.discovery_url(topology);
        info!(
            host = %first,
            quorum,
            join = %join_address,
            "Bootstrap node started"
        );

        let catalog = &self.catalog;
        let join = join_address.as_str();
        let report = self
            .fleet
            .run(joiners, |connection| {
                let spec = catalog.discovery_joiner(connection.address(), join);
                async move {
                    connection.run_image(DISCOVERY_CONTAINER, &spec).await?;
                    Ok(connection)
                }
            })
            .await;

        let mut members = Vec::with_capacity(hosts.len());
        members.push(bootstrap);
        members.extend(report.succeeded.into_iter().map(|(_, c)| c));

        if report.failed.is_empty() {
            info!(joined = members.len(), "Discovery quorum formed");
        } else {
            warn!(
                joined = members.len(),
                expected = hosts.len(),
                "Discovery quorum incomplete"
            );
        }

        Ok(QuorumOutcome {
            quorum,
            expected: hosts.len(),
            members,
            failures: report.failed,
            join_address,
            discovery_url,
        })
    }
}
