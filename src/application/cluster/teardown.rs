//! Removal of every cluster container from a set of hosts.

use tracing::info;

use crate::application::connection::Removal;
use crate::application::fleet::{Fleet, FleetReport};
use crate::domain::host::HostId;
use crate::domain::role::ServiceRole;

/// Removes the fixed-name containers of all service roles.
pub struct Teardown {
    fleet: Fleet,
}

impl Teardown {
    #[must_use]
    pub fn new(fleet: Fleet) -> Self {
        Self { fleet }
    }

    /// Remove all four role containers from each host.
    ///
    /// Every name is attempted on every reachable host whether or not it
    /// is running there. Absent containers count as success; hosts that
    /// cannot be reached land in the report's failures.
    pub async fn destroy(&self, hosts: &[HostId]) -> FleetReport<Vec<Removal>> {
        let names = ServiceRole::all_container_names();
        let names = names.as_slice();

        let report = self
            .fleet
            .run(hosts, |connection| async move {
                Ok(connection.remove_forcibly(names).await)
            })
            .await;

        info!(
            hosts = report.succeeded.len(),
            unreachable = report.failed.len(),
            "Teardown finished"
        );
        report
    }
}
