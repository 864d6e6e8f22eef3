//! Helpers shared by operator implementations.

use crate::application::fleet::FleetReport;
use crate::domain::host::HostId;
use crate::error::{Error, Result};
use crate::port::inbound::operator::cluster::FailedHost;
use crate::port::inbound::operator::inspect::HostLookup;

/// Parse request host names, rejecting an empty list.
pub(super) fn host_ids(hosts: &[String]) -> Result<Vec<HostId>> {
    if hosts.is_empty() {
        return Err(Error::NoHosts);
    }
    Ok(hosts.iter().map(|name| HostId::new(name.as_str())).collect())
}

pub(super) fn failed_hosts<T>(report: &FleetReport<T>) -> Vec<FailedHost> {
    report
        .failures()
        .into_iter()
        .map(|failure| FailedHost {
            host: failure.host.to_string(),
            reason: failure.reason,
        })
        .collect()
}

/// Flatten a report back into per-host lookups in the order hosts were given.
pub(super) fn lookups<T>(hosts: &[HostId], report: FleetReport<T>) -> Vec<HostLookup<T>> {
    let mut succeeded: Vec<Option<(HostId, T)>> = report.succeeded.into_iter().map(Some).collect();
    let mut failed: Vec<Option<(HostId, Error)>> = report.failed.into_iter().map(Some).collect();

    hosts
        .iter()
        .filter_map(|host| {
            if let Some((_, value)) = take(&mut succeeded, host) {
                return Some(HostLookup {
                    host: host.to_string(),
                    outcome: Ok(value),
                });
            }
            take(&mut failed, host).map(|(_, error)| HostLookup {
                host: host.to_string(),
                outcome: Err(error.to_string()),
            })
        })
        .collect()
}

fn take<V>(entries: &mut [Option<(HostId, V)>], host: &HostId) -> Option<(HostId, V)> {
    entries
        .iter_mut()
        .find(|entry| entry.as_ref().is_some_and(|(h, _)| h == host))
        .and_then(Option::take)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn empty_host_list_is_rejected() {
        assert!(matches!(host_ids(&[]), Err(Error::NoHosts)));
    }

    #[test]
    fn lookups_follow_request_order_with_duplicates() {
        let hosts = vec![HostId::new("a"), HostId::new("b"), HostId::new("a")];
        let report = FleetReport {
            succeeded: vec![(HostId::new("a"), 1), (HostId::new("a"), 3)],
            failed: vec![(
                HostId::new("b"),
                Error::Config(ConfigError::MissingField { field: "x" }),
            )],
        };

        let lookups = lookups(&hosts, report);

        assert_eq!(lookups.len(), 3);
        assert_eq!(lookups[0].outcome, Ok(1));
        assert!(lookups[1].outcome.is_err());
        assert_eq!(lookups[2].outcome, Ok(3));
    }
}
