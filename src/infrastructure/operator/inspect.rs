//! Read-only host inspection over the orchestrator's directory and fleet.

use async_trait::async_trait;
use tracing::warn;

use super::entry::Operator;
use super::shared::{host_ids, lookups};
use crate::domain::host::HostId;
use crate::error::Result;
use crate::port::inbound::operator::cluster::ClusterRequest;
use crate::port::inbound::operator::inspect::{
    ConnectionFlags, ContainerRow, HostLookup, InspectOperator,
};
use crate::port::outbound::engine::ContainerSummary;

const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn container_row(summary: ContainerSummary) -> ContainerRow {
    ContainerRow {
        id: summary.id.short().to_string(),
        names: summary.names.join(","),
        image: summary.image,
        state: summary.state,
        status: summary.status,
        created: summary
            .created
            .map(|at| at.format(CREATED_FORMAT).to_string())
            .unwrap_or_default(),
    }
}

#[async_trait]
impl InspectOperator for Operator {
    async fn addresses(&self, request: &ClusterRequest) -> Result<Vec<HostLookup<String>>> {
        let hosts = host_ids(&request.hosts)?;
        let orchestrator = self.orchestrator(request)?;

        let report = orchestrator
            .fleet()
            .run(&hosts, |connection| async move {
                Ok(connection.address().to_string())
            })
            .await;
        Ok(lookups(&hosts, report))
    }

    async fn engine_urls(&self, request: &ClusterRequest) -> Result<Vec<HostLookup<String>>> {
        let hosts = host_ids(&request.hosts)?;
        let orchestrator = self.orchestrator(request)?;

        let report = orchestrator
            .fleet()
            .run(&hosts, |connection| async move {
                Ok(connection.endpoint().url().to_string())
            })
            .await;
        Ok(lookups(&hosts, report))
    }

    async fn describe(&self, request: &ClusterRequest, host: &str) -> Result<serde_json::Value> {
        let orchestrator = self.orchestrator(request)?;
        orchestrator.directory().describe(&HostId::new(host)).await
    }

    async fn connection_flags(
        &self,
        request: &ClusterRequest,
        host: &str,
    ) -> Result<ConnectionFlags> {
        let orchestrator = self.orchestrator(request)?;
        let endpoint = orchestrator.directory().resolve(&HostId::new(host)).await?;
        let path = |p: &std::path::Path| p.display().to_string();

        Ok(ConnectionFlags {
            ca_cert: endpoint.tls().map(|tls| path(&tls.ca_cert)),
            client_cert: endpoint.tls().map(|tls| path(&tls.client_cert)),
            client_key: endpoint.tls().map(|tls| path(&tls.client_key)),
            engine_url: endpoint.url().to_string(),
        })
    }

    async fn containers(&self, request: &ClusterRequest, host: &str) -> Result<Vec<ContainerRow>> {
        let orchestrator = self.orchestrator(request)?;
        let connection = orchestrator
            .fleet()
            .connector()
            .open(&HostId::new(host))
            .await?;

        let containers = connection.containers().await?;
        Ok(containers.into_iter().map(container_row).collect())
    }

    async fn start_machines(&self, request: &ClusterRequest) -> Result<Vec<HostLookup<()>>> {
        let hosts = host_ids(&request.hosts)?;
        let orchestrator = self.orchestrator(request)?;
        let directory = orchestrator.directory();

        let mut started = Vec::with_capacity(hosts.len());
        for host in &hosts {
            let outcome = directory.start_machine(host).await.map_err(|error| {
                warn!(host = %host, error = %error, "Failed to start machine");
                error.to_string()
            });
            started.push(HostLookup {
                host: host.to_string(),
                outcome,
            });
        }
        Ok(started)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testkit::directory::MemoryDirectory;
    use crate::testkit::engine::ScriptedEngine;

    fn operator(names: &[&str]) -> (Operator, Arc<MemoryDirectory>, Arc<ScriptedEngine>) {
        let directory = Arc::new(MemoryDirectory::with_hosts(names));
        let engine = Arc::new(ScriptedEngine::new());
        (
            Operator::with_adapters(directory.clone(), engine.clone()),
            directory,
            engine,
        )
    }

    fn request(hosts: &[&str]) -> ClusterRequest {
        ClusterRequest {
            config_toml: None,
            hosts: hosts.iter().map(|h| (*h).to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn addresses_keep_request_order_and_report_unknown_hosts() {
        let (operator, _, _) = operator(&["a", "b"]);

        let lookups = operator.addresses(&request(&["b", "ghost", "a"])).await.unwrap();

        let hosts: Vec<_> = lookups.iter().map(|l| l.host.as_str()).collect();
        assert_eq!(hosts, vec!["b", "ghost", "a"]);
        assert_eq!(lookups[0].outcome, Ok("10.0.0.6".to_string()));
        assert!(lookups[1].outcome.is_err());
        assert_eq!(lookups[2].outcome, Ok("10.0.0.5".to_string()));
    }

    #[tokio::test]
    async fn engine_urls_use_the_engine_port() {
        let (operator, _, _) = operator(&["a"]);

        let lookups = operator.engine_urls(&request(&["a"])).await.unwrap();

        assert_eq!(lookups[0].outcome, Ok("tcp://10.0.0.5:2376".to_string()));
    }

    #[tokio::test]
    async fn containers_lists_seeded_names() {
        let (operator, _, engine) = operator(&["a"]);
        engine.seed_container("a", "web");

        let rows = operator.containers(&request(&[]), "a").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].names, "web");
    }

    #[tokio::test]
    async fn start_machines_tries_every_host() {
        let (operator, directory, _) = operator(&["a", "b"]);

        let results = operator
            .start_machines(&request(&["a", "ghost", "b"]))
            .await
            .unwrap();

        assert!(results[0].outcome.is_ok());
        assert!(results[1].outcome.is_err());
        assert!(results[2].outcome.is_ok());
        assert_eq!(directory.started(), vec![HostId::new("a"), HostId::new("b")]);
    }
}
