//! Entry point for cluster use cases.
//!
//! Owns the service catalog and the fleet and hands them to the quorum
//! bootstrapper, the service launcher and the teardown.

use std::sync::Arc;

use tracing::info;

use super::bootstrap::{FormedQuorum, QuorumBootstrapper};
use super::service::ServiceLauncher;
use super::teardown::Teardown;
use crate::application::connection::{Connector, Removal};
use crate::application::fleet::{Fleet, FleetReport};
use crate::application::settings::LaunchSettings;
use crate::domain::host::HostId;
use crate::domain::service::ServiceCatalog;
use crate::error::Result;
use crate::port::outbound::directory::HostDirectory;
use crate::port::outbound::engine::EngineConnector;

/// A fully provisioned cluster.
#[derive(Debug)]
pub struct ProvisionedCluster {
    pub quorum: FormedQuorum,
    /// Hosts that received scheduler and registrar containers.
    pub provisioned: Vec<HostId>,
}

/// Cluster lifecycle over one directory and one engine connector.
pub struct ClusterOrchestrator {
    catalog: Arc<ServiceCatalog>,
    fleet: Fleet,
    settings: LaunchSettings,
}

impl ClusterOrchestrator {
    #[must_use]
    pub fn new(
        catalog: ServiceCatalog,
        directory: Arc<dyn HostDirectory>,
        engines: Arc<dyn EngineConnector>,
        settings: LaunchSettings,
    ) -> Self {
        let connector = Connector::new(directory, engines, settings.settle_delay);
        Self {
            catalog: Arc::new(catalog),
            fleet: Fleet::new(connector, settings.fan_out),
            settings,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    #[must_use]
    pub fn directory(&self) -> &Arc<dyn HostDirectory> {
        self.fleet.connector().directory()
    }

    /// Form the discovery quorum and require every host to join.
    ///
    /// # Errors
    ///
    /// Bootstrap-node errors, or
    /// [`Error::IncompleteQuorum`](crate::error::Error::IncompleteQuorum)
    /// when any joiner failed.
    pub async fn form_quorum(&self, hosts: &[HostId]) -> Result<FormedQuorum> {
        QuorumBootstrapper::new(Arc::clone(&self.catalog), self.fleet.clone())
            .form(hosts)
            .await?
            .into_formed()
    }

    /// Form the quorum, then launch dependent services on every member.
    ///
    /// No service is launched unless every host joined the quorum.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::form_quorum`], or the service launch error as
    /// shaped by the configured failure policy.
    pub async fn create(&self, hosts: &[HostId]) -> Result<ProvisionedCluster> {
        let quorum = self.form_quorum(hosts).await?;

        let provisioned = self
            .launcher()
            .launch(&quorum.members, &quorum.discovery_url)
            .await?;
        info!(
            hosts = provisioned.len(),
            discovery = %quorum.discovery_url,
            "Cluster created"
        );

        Ok(ProvisionedCluster {
            quorum,
            provisioned,
        })
    }

    /// Remove every service container from each host.
    pub async fn destroy(&self, hosts: &[HostId]) -> FleetReport<Vec<Removal>> {
        Teardown::new(self.fleet.clone()).destroy(hosts).await
    }

    /// Remove and relaunch the registrar on each host.
    pub async fn relaunch_registrar(&self, hosts: &[HostId]) -> FleetReport<()> {
        self.launcher().relaunch_registrar(hosts).await
    }

    fn launcher(&self) -> ServiceLauncher {
        ServiceLauncher::new(
            Arc::clone(&self.catalog),
            self.fleet.clone(),
            self.settings.service_failure,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::{DISCOVERY_CONTAINER, REGISTRAR_CONTAINER};
    use crate::error::{EngineError, Error};
    use crate::testkit::fixtures;

    #[tokio::test]
    async fn create_provisions_every_host() {
        let (orchestrator, directory, engine) = fixtures::orchestrator(&["a", "b", "c"]);

        let cluster = orchestrator.create(&fixtures::hosts(&["a", "b", "c"])).await.unwrap();

        assert_eq!(cluster.quorum.quorum, 2);
        assert_eq!(cluster.provisioned.len(), 3);
        assert_eq!(engine.running("c").len(), 4);
        assert_eq!(
            directory.membership("c").map(|m| m.discovery),
            Some("consul://10.0.0.5:8500/barney".to_string())
        );
    }

    #[tokio::test]
    async fn incomplete_quorum_launches_no_services() {
        let (orchestrator, _, engine) = fixtures::orchestrator(&["a", "b", "c"]);
        engine.fail_start("c", EngineError::Transport("timeout".into()));

        let err = orchestrator.create(&fixtures::hosts(&["a", "b", "c"])).await.unwrap_err();

        assert!(matches!(err, Error::IncompleteQuorum { joined: 2, expected: 3, .. }));
        for host in ["a", "b", "c"] {
            assert_eq!(engine.created(host), vec![DISCOVERY_CONTAINER.to_string()]);
        }
    }

    #[tokio::test]
    async fn relaunch_touches_only_the_registrar() {
        let (orchestrator, _, engine) = fixtures::orchestrator(&["a"]);

        let report = orchestrator.relaunch_registrar(&fixtures::hosts(&["a"])).await;

        assert!(report.is_complete());
        assert_eq!(engine.created("a"), vec![REGISTRAR_CONTAINER.to_string()]);
    }
}
