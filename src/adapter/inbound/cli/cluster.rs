//! Handlers for the cluster lifecycle commands.

use std::future::Future;

use serde_json::json;

use super::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::cluster::{
    ClusterRequest, FailedHost, FanOutSummary, QuorumSummary, RemovalStatus, TeardownSummary,
};

fn failed_json(failed: &[FailedHost]) -> Vec<serde_json::Value> {
    failed
        .iter()
        .map(|f| json!({ "host": f.host, "reason": f.reason }))
        .collect()
}

fn quorum_json(summary: &QuorumSummary) -> serde_json::Value {
    json!({
        "cluster": summary.cluster,
        "bootstrap": summary.bootstrap_host,
        "quorum": summary.quorum,
        "joined": summary.joined,
        "discovery_url": summary.discovery_url,
    })
}

fn print_quorum(summary: &QuorumSummary) {
    output::field("Cluster", &summary.cluster);
    output::field("Bootstrap", &summary.bootstrap_host);
    output::field(
        "Quorum",
        format!("{} of {}", summary.quorum, summary.joined.len()),
    );
    output::field("Discovery", output::highlight(&summary.discovery_url));
}

/// Await `work` behind a spinner finished with `done` or `failed`.
async fn tracked<T>(
    message: &str,
    done: &str,
    failed: &str,
    work: impl Future<Output = Result<T>>,
) -> Result<T> {
    let spinner = output::spinner(message);
    match work.await {
        Ok(value) => {
            output::spinner_success(&spinner, done);
            Ok(value)
        }
        Err(error) => {
            output::spinner_fail(&spinner, failed);
            Err(error)
        }
    }
}

/// Execute `create`.
pub async fn create(request: &ClusterRequest) -> Result<()> {
    let summary = tracked(
        &format!("Creating cluster on {} host(s)", request.hosts.len()),
        "Cluster created",
        "Cluster creation failed",
        operator::operator().create(request),
    )
    .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "create",
            "quorum": quorum_json(&summary.quorum),
            "provisioned": summary.provisioned,
        }));
        return Ok(());
    }

    print_quorum(&summary.quorum);
    output::field("Services", summary.provisioned.join(", "));
    Ok(())
}

/// Execute `consul`.
pub async fn consul(request: &ClusterRequest) -> Result<()> {
    let summary = tracked(
        "Forming consul quorum",
        "Consul quorum formed",
        "Consul quorum failed",
        operator::operator().consul(request),
    )
    .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "consul",
            "quorum": quorum_json(&summary),
        }));
        return Ok(());
    }

    print_quorum(&summary);
    Ok(())
}

/// Execute `destroy`.
pub async fn destroy(request: &ClusterRequest) -> Result<()> {
    let summary = tracked(
        "Removing cluster containers",
        "Teardown finished",
        "Teardown failed",
        operator::operator().destroy(request),
    )
    .await?;

    if output::is_json() {
        output::json_output(teardown_json(&summary));
        return Ok(());
    }

    for host in &summary.hosts {
        output::section(&host.host);
        for (name, status) in &host.containers {
            match status {
                RemovalStatus::Removed => output::success(&format!("removed {name}")),
                RemovalStatus::Absent => output::note(&format!("{name} not present")),
                RemovalStatus::Failed(reason) => {
                    output::warning(&format!("{name}: {reason}"));
                }
            }
        }
    }
    for failed in &summary.unreachable {
        output::host_failure(&failed.host, &failed.reason);
    }
    Ok(())
}

fn teardown_json(summary: &TeardownSummary) -> serde_json::Value {
    let hosts: Vec<_> = summary
        .hosts
        .iter()
        .map(|host| {
            let containers: Vec<_> = host
                .containers
                .iter()
                .map(|(name, status)| {
                    let (status, reason) = match status {
                        RemovalStatus::Removed => ("removed", None),
                        RemovalStatus::Absent => ("absent", None),
                        RemovalStatus::Failed(reason) => ("failed", Some(reason)),
                    };
                    json!({ "name": name, "status": status, "reason": reason })
                })
                .collect();
            json!({ "host": host.host, "containers": containers })
        })
        .collect();

    json!({
        "command": "destroy",
        "hosts": hosts,
        "unreachable": failed_json(&summary.unreachable),
    })
}

/// Execute `registrator`.
pub async fn registrator(request: &ClusterRequest) -> Result<()> {
    let summary = tracked(
        "Relaunching registrator",
        "Registrator relaunch finished",
        "Registrator relaunch failed",
        operator::operator().registrator(request),
    )
    .await?;

    print_fan_out("registrator", &summary);
    Ok(())
}

fn print_fan_out(command: &str, summary: &FanOutSummary) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "succeeded": summary.succeeded,
            "failed": failed_json(&summary.failed),
        }));
        return;
    }

    for host in &summary.succeeded {
        output::success(host);
    }
    for failed in &summary.failed {
        output::host_failure(&failed.host, &failed.reason);
    }
}
