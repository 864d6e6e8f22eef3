//! In-memory [`HostDirectory`] for orchestration tests.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use crate::domain::host::{Endpoint, HostId, SwarmMembership};
use crate::domain::service::DEFAULT_ENGINE_PORT;
use crate::error::{Error, Result};
use crate::port::outbound::directory::HostDirectory;

struct Record {
    endpoint: Endpoint,
    membership: Option<SwarmMembership>,
}

/// Host inventory kept in memory.
///
/// Unknown hosts fail to resolve with [`Error::Resolution`], like a machine
/// missing from the on-disk store.
#[derive(Default)]
pub struct MemoryDirectory {
    records: Mutex<BTreeMap<HostId, Record>>,
    persist_failures: Mutex<HashSet<HostId>>,
    started: Mutex<Vec<HostId>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory where the `i`-th name lives at `10.0.0.<i + 5>`.
    ///
    /// The first host of `&["a", "b"]` resolves to `tcp://10.0.0.5:2376`.
    pub fn with_hosts(names: &[&str]) -> Self {
        let directory = Self::new();
        for (i, name) in names.iter().enumerate() {
            directory.insert(name, &format!("10.0.0.{}", i + 5));
        }
        directory
    }

    /// Register a host at `address` on the default engine port.
    pub fn insert(&self, name: &str, address: &str) {
        let host = HostId::new(name);
        let url = format!("tcp://{address}:{DEFAULT_ENGINE_PORT}");
        let endpoint = match Endpoint::parse(host.clone(), url, None) {
            Ok(endpoint) => endpoint,
            Err(e) => panic!("invalid test address {address}: {e}"),
        };
        self.records.lock().insert(
            host,
            Record {
                endpoint,
                membership: None,
            },
        );
    }

    /// Make `persist_membership` fail for `name`.
    pub fn fail_persist(&self, name: &str) {
        self.persist_failures.lock().insert(HostId::new(name));
    }

    /// Membership last persisted for `name`.
    pub fn membership(&self, name: &str) -> Option<SwarmMembership> {
        self.records
            .lock()
            .get(&HostId::new(name))
            .and_then(|r| r.membership.clone())
    }

    /// Hosts whose machine was started, in call order.
    pub fn started(&self) -> Vec<HostId> {
        self.started.lock().clone()
    }

    fn unknown(host: &HostId) -> Error {
        Error::Resolution {
            host: host.clone(),
            reason: "host does not exist".to_string(),
        }
    }
}

#[async_trait]
impl HostDirectory for MemoryDirectory {
    async fn resolve(&self, host: &HostId) -> Result<Endpoint> {
        self.records
            .lock()
            .get(host)
            .map(|r| r.endpoint.clone())
            .ok_or_else(|| Self::unknown(host))
    }

    async fn persist_membership(&self, host: &HostId, membership: &SwarmMembership) -> Result<()> {
        if self.persist_failures.lock().contains(host) {
            return Err(Error::Persist {
                host: host.clone(),
                reason: "store is read-only".to_string(),
            });
        }
        let mut records = self.records.lock();
        let record = records.get_mut(host).ok_or_else(|| Self::unknown(host))?;
        record.membership = Some(membership.clone());
        Ok(())
    }

    async fn describe(&self, host: &HostId) -> Result<serde_json::Value> {
        let records = self.records.lock();
        let record = records.get(host).ok_or_else(|| Self::unknown(host))?;
        let swarm = record.membership.as_ref().map_or_else(
            || json!({ "IsSwarm": false, "Master": false, "Discovery": "" }),
            |m| json!({ "IsSwarm": m.is_swarm, "Master": m.master, "Discovery": m.discovery }),
        );
        Ok(json!({
            "Name": host.as_str(),
            "Driver": { "IPAddress": record.endpoint.address() },
            "HostOptions": { "SwarmOptions": swarm },
        }))
    }

    async fn start_machine(&self, host: &HostId) -> Result<()> {
        if !self.records.lock().contains_key(host) {
            return Err(Self::unknown(host));
        }
        self.started.lock().push(host.clone());
        Ok(())
    }
}
