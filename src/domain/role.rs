//! Service roles launched on cluster hosts and their fixed container names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Container name of the discovery agent.
pub const DISCOVERY_CONTAINER: &str = "clusterator_consul";
/// Container name of the scheduler agent.
pub const SCHEDULER_AGENT_CONTAINER: &str = "clusterator_swarm_agent";
/// Container name of the scheduler master.
pub const SCHEDULER_MASTER_CONTAINER: &str = "clusterator_swarm_master";
/// Container name of the service registrar.
pub const REGISTRAR_CONTAINER: &str = "clusterator_registrator";

/// A control-plane service run on every cluster host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRole {
    Discovery,
    SchedulerAgent,
    SchedulerMaster,
    Registrar,
}

impl ServiceRole {
    /// Every role, in launch order.
    pub const ALL: [ServiceRole; 4] = [
        ServiceRole::Discovery,
        ServiceRole::SchedulerAgent,
        ServiceRole::SchedulerMaster,
        ServiceRole::Registrar,
    ];

    /// Fixed container name, shared by launch and teardown.
    #[must_use]
    pub const fn container_name(self) -> &'static str {
        match self {
            Self::Discovery => DISCOVERY_CONTAINER,
            Self::SchedulerAgent => SCHEDULER_AGENT_CONTAINER,
            Self::SchedulerMaster => SCHEDULER_MASTER_CONTAINER,
            Self::Registrar => REGISTRAR_CONTAINER,
        }
    }

    /// Container names of every role.
    #[must_use]
    pub fn all_container_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|role| role.container_name()).collect()
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovery => "discovery",
            Self::SchedulerAgent => "scheduler-agent",
            Self::SchedulerMaster => "scheduler-master",
            Self::Registrar => "registrar",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn container_names_are_distinct() {
        let names: HashSet<_> = ServiceRole::all_container_names().into_iter().collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn discovery_name_is_stable() {
        assert_eq!(ServiceRole::Discovery.container_name(), "clusterator_consul");
    }
}
