//! Handlers for the read-only host commands.

use serde_json::json;
use tabled::Tabled;

use super::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::cluster::ClusterRequest;
use crate::port::inbound::operator::inspect::{ContainerRow, HostLookup};

#[derive(Tabled)]
struct ContainerTableRow {
    #[tabled(rename = "Container")]
    id: String,
    #[tabled(rename = "Name")]
    names: String,
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<ContainerRow> for ContainerTableRow {
    fn from(row: ContainerRow) -> Self {
        Self {
            id: row.id,
            names: row.names,
            image: row.image,
            state: row.state,
            status: row.status,
            created: row.created,
        }
    }
}

/// Print `host value` per host; failures go to the error stream.
fn print_lookups(command: &str, lookups: &[HostLookup<String>]) {
    if output::is_json() {
        let hosts: Vec<_> = lookups
            .iter()
            .map(|l| match &l.outcome {
                Ok(value) => json!({ "host": l.host, "value": value }),
                Err(reason) => json!({ "host": l.host, "error": reason }),
            })
            .collect();
        output::json_output(json!({ "command": command, "hosts": hosts }));
        return;
    }

    for lookup in lookups {
        match &lookup.outcome {
            Ok(value) => output::plain(&format!("{} {value}", lookup.host)),
            Err(reason) => output::error(&format!("{}: {reason}", lookup.host)),
        }
    }
}

/// Execute `ip`.
pub async fn ip(request: &ClusterRequest) -> Result<()> {
    let lookups = operator::operator().addresses(request).await?;
    print_lookups("ip", &lookups);
    Ok(())
}

/// Execute `url`.
pub async fn url(request: &ClusterRequest) -> Result<()> {
    let lookups = operator::operator().engine_urls(request).await?;
    print_lookups("url", &lookups);
    Ok(())
}

/// Execute `json`.
pub async fn json(request: &ClusterRequest, host: &str) -> Result<()> {
    let record = operator::operator().describe(request, host).await?;
    output::plain(&serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Execute `config`: flags for `docker $(clusterator config <host>) ...`.
pub async fn config(request: &ClusterRequest, host: &str) -> Result<()> {
    let flags = operator::operator().connection_flags(request, host).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config",
            "host": host,
            "tlscacert": flags.ca_cert,
            "tlscert": flags.client_cert,
            "tlskey": flags.client_key,
            "url": flags.engine_url,
        }));
        return Ok(());
    }

    let mut parts = Vec::new();
    if let (Some(ca), Some(cert), Some(key)) = (&flags.ca_cert, &flags.client_cert, &flags.client_key)
    {
        parts.push("--tlsverify".to_string());
        parts.push(format!("--tlscacert={ca:?}"));
        parts.push(format!("--tlscert={cert:?}"));
        parts.push(format!("--tlskey={key:?}"));
    }
    parts.push(format!("-H={}", flags.engine_url));
    output::plain(&parts.join(" "));
    Ok(())
}

/// Execute `ps`.
pub async fn ps(request: &ClusterRequest, host: &str) -> Result<()> {
    let rows = operator::operator().containers(request, host).await?;

    if output::is_json() {
        let containers: Vec<_> = rows
            .iter()
            .map(|row| {
                json!({
                    "id": row.id,
                    "names": row.names,
                    "image": row.image,
                    "state": row.state,
                    "status": row.status,
                    "created": row.created,
                })
            })
            .collect();
        output::json_output(json!({ "command": "ps", "host": host, "containers": containers }));
        return Ok(());
    }

    if rows.is_empty() {
        output::note(&format!("no containers on {host}"));
        return Ok(());
    }
    output::table(rows.into_iter().map(ContainerTableRow::from).collect());
    Ok(())
}

/// Execute `start-machines`.
pub async fn start_machines(request: &ClusterRequest) -> Result<()> {
    let spinner = output::spinner(&format!("Starting {} machine(s)", request.hosts.len()));
    let results = match operator::operator().start_machines(request).await {
        Ok(results) => results,
        Err(error) => {
            output::spinner_fail(&spinner, "Machines not started");
            return Err(error);
        }
    };
    let failures = results.iter().filter(|r| r.outcome.is_err()).count();
    if failures == 0 {
        output::spinner_success(&spinner, "Machines started");
    } else {
        output::spinner_fail(&spinner, &format!("{failures} machine(s) failed to start"));
    }

    if output::is_json() {
        let hosts: Vec<_> = results
            .iter()
            .map(|r| json!({ "host": r.host, "error": r.outcome.as_ref().err() }))
            .collect();
        output::json_output(json!({ "command": "start-machines", "hosts": hosts }));
        return Ok(());
    }

    for result in &results {
        match &result.outcome {
            Ok(()) => output::success(&result.host),
            Err(reason) => output::host_failure(&result.host, reason),
        }
    }
    Ok(())
}
