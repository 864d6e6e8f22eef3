//! Cluster lifecycle use cases over the orchestrator.

use async_trait::async_trait;

use super::entry::Operator;
use super::shared::{failed_hosts, host_ids};
use crate::application::cluster::bootstrap::FormedQuorum;
use crate::application::connection::RemovalOutcome;
use crate::error::Result;
use crate::port::inbound::operator::cluster::{
    ClusterOperator, ClusterRequest, CreateSummary, FanOutSummary, HostTeardown, QuorumSummary,
    RemovalStatus, TeardownSummary,
};

fn quorum_summary(cluster: &str, formed: &FormedQuorum) -> QuorumSummary {
    let joined: Vec<String> = formed
        .members
        .iter()
        .map(|connection| connection.host().to_string())
        .collect();

    QuorumSummary {
        cluster: cluster.to_string(),
        bootstrap_host: joined.first().cloned().unwrap_or_default(),
        quorum: formed.quorum,
        joined,
        discovery_url: formed.discovery_url.clone(),
    }
}

fn removal_status(outcome: RemovalOutcome) -> RemovalStatus {
    match outcome {
        RemovalOutcome::Removed => RemovalStatus::Removed,
        RemovalOutcome::Absent => RemovalStatus::Absent,
        RemovalOutcome::Failed(error) => RemovalStatus::Failed(error.to_string()),
    }
}

#[async_trait]
impl ClusterOperator for Operator {
    async fn create(&self, request: &ClusterRequest) -> Result<CreateSummary> {
        let hosts = host_ids(&request.hosts)?;
        let orchestrator = self.orchestrator(request)?;
        let cluster = orchestrator.catalog().topology.cluster.to_string();

        let provisioned = orchestrator.create(&hosts).await?;

        Ok(CreateSummary {
            quorum: quorum_summary(&cluster, &provisioned.quorum),
            provisioned: provisioned
                .provisioned
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
    }

    async fn consul(&self, request: &ClusterRequest) -> Result<QuorumSummary> {
        let hosts = host_ids(&request.hosts)?;
        let orchestrator = self.orchestrator(request)?;
        let cluster = orchestrator.catalog().topology.cluster.to_string();

        let formed = orchestrator.form_quorum(&hosts).await?;
        Ok(quorum_summary(&cluster, &formed))
    }

    async fn destroy(&self, request: &ClusterRequest) -> Result<TeardownSummary> {
        let hosts = host_ids(&request.hosts)?;
        let orchestrator = self.orchestrator(request)?;

        let report = orchestrator.destroy(&hosts).await;
        let unreachable = failed_hosts(&report);
        let hosts = report
            .succeeded
            .into_iter()
            .map(|(host, removals)| HostTeardown {
                host: host.to_string(),
                containers: removals
                    .into_iter()
                    .map(|removal| (removal.name, removal_status(removal.outcome)))
                    .collect(),
            })
            .collect();

        Ok(TeardownSummary { hosts, unreachable })
    }

    async fn registrator(&self, request: &ClusterRequest) -> Result<FanOutSummary> {
        let hosts = host_ids(&request.hosts)?;
        let orchestrator = self.orchestrator(request)?;

        let report = orchestrator.relaunch_registrar(&hosts).await;
        Ok(FanOutSummary {
            failed: failed_hosts(&report),
            succeeded: report
                .succeeded
                .into_iter()
                .map(|(host, ())| host.to_string())
                .collect(),
        })
    }
}
