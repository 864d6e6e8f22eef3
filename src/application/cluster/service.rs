//! Scheduler and registrar launch on hosts that joined the quorum.
//!
//! Per host, in order: scheduler agent, scheduler master, membership
//! write-back through the host directory, then the registrar. Only
//! connections that came out of a formed quorum are ever passed in, so a
//! host whose discovery agent failed never gets these containers.

use std::sync::Arc;

use tracing::info;

use crate::application::connection::{Connection, RemovalOutcome};
use crate::application::fleet::{Fleet, FleetReport};
use crate::application::settings::ServiceFailurePolicy;
use crate::domain::host::{HostId, SwarmMembership};
use crate::domain::role::{REGISTRAR_CONTAINER, SCHEDULER_AGENT_CONTAINER, SCHEDULER_MASTER_CONTAINER};
use crate::domain::service::ServiceCatalog;
use crate::error::{Error, Result};

/// Launches the services that depend on discovery.
pub struct ServiceLauncher {
    catalog: Arc<ServiceCatalog>,
    fleet: Fleet,
    policy: ServiceFailurePolicy,
}

impl ServiceLauncher {
    #[must_use]
    pub fn new(catalog: Arc<ServiceCatalog>, fleet: Fleet, policy: ServiceFailurePolicy) -> Self {
        Self {
            catalog,
            fleet,
            policy,
        }
    }

    /// Provision every member and return the hosts that were provisioned.
    ///
    /// # Errors
    ///
    /// With [`ServiceFailurePolicy::Abort`] the first failing host's error.
    /// With [`ServiceFailurePolicy::Continue`] an [`Error::ServiceLaunch`]
    /// listing every failed host, after all hosts were attempted.
    pub async fn launch(&self, members: &[Connection], discovery_url: &str) -> Result<Vec<HostId>> {
        let provision = |connection| self.provision(connection, discovery_url);

        match self.policy {
            ServiceFailurePolicy::Abort => self.fleet.try_each(members, provision).await,
            ServiceFailurePolicy::Continue => {
                let report = self.fleet.each(members, provision).await;
                if report.is_complete() {
                    Ok(report.succeeded.into_iter().map(|(host, _)| host).collect())
                } else {
                    Err(Error::ServiceLaunch {
                        failures: report.failures(),
                    })
                }
            }
        }
    }

    async fn provision(&self, connection: &Connection, discovery_url: &str) -> Result<HostId> {
        let host = connection.host();

        let agent = self
            .catalog
            .scheduler_agent(&connection.endpoint().host_port(), discovery_url);
        connection.run_image(SCHEDULER_AGENT_CONTAINER, &agent).await?;

        let master = self.catalog.scheduler_master(connection.address(), discovery_url);
        connection.run_image(SCHEDULER_MASTER_CONTAINER, &master).await?;

        self.fleet
            .connector()
            .directory()
            .persist_membership(host, &SwarmMembership::master(discovery_url))
            .await?;

        connection
            .run_image(REGISTRAR_CONTAINER, &self.catalog.registrar())
            .await?;

        info!(host = %host, "Services launched");
        Ok(host.clone())
    }

    /// Remove and relaunch the registrar on each host.
    ///
    /// Hosts are independent: one failing never stops the others.
    pub async fn relaunch_registrar(&self, hosts: &[HostId]) -> FleetReport<()> {
        let catalog = &self.catalog;
        self.fleet
            .run(hosts, |connection| {
                let spec = catalog.registrar();
                async move {
                    let removal = connection.remove_forcibly(&[REGISTRAR_CONTAINER]).await;
                    if let Some(RemovalOutcome::Failed(source)) =
                        removal.into_iter().next().map(|r| r.outcome)
                    {
                        return Err(Error::Engine {
                            host: connection.host().clone(),
                            source,
                        });
                    }
                    connection.run_image(REGISTRAR_CONTAINER, &spec).await?;
                    Ok(())
                }
            })
            .await
    }
}
