//! Fan-out of one operation across many hosts.
//!
//! [`Fleet`] opens a connection per host and applies an operation to it.
//! A failure on one host, whether resolving it or running the operation,
//! is recorded and logged but never stops the remaining hosts. Callers
//! that need all-or-nothing semantics use [`Fleet::try_each`].

use std::future::Future;

use futures_util::future::join_all;
use tracing::warn;

use super::connection::{Connection, Connector};
use super::settings::FanOut;
use crate::domain::host::HostId;
use crate::error::{Error, HostFailure, Result};

/// Per-host results of a fan-out, in the order hosts were given.
#[derive(Debug)]
pub struct FleetReport<T> {
    pub succeeded: Vec<(HostId, T)>,
    pub failed: Vec<(HostId, Error)>,
}

impl<T> Default for FleetReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> FleetReport<T> {
    /// True when no host failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Printable failures.
    #[must_use]
    pub fn failures(&self) -> Vec<HostFailure> {
        self.failed
            .iter()
            .map(|(host, error)| HostFailure {
                host: host.clone(),
                reason: error.to_string(),
            })
            .collect()
    }

    fn push(&mut self, host: HostId, result: Result<T>) {
        match result {
            Ok(value) => self.succeeded.push((host, value)),
            Err(error) => {
                warn!(host = %host, error = %error, "Host operation failed");
                self.failed.push((host, error));
            }
        }
    }
}

/// Applies operations to a set of hosts.
#[derive(Clone)]
pub struct Fleet {
    connector: Connector,
    fan_out: FanOut,
}

impl Fleet {
    #[must_use]
    pub fn new(connector: Connector, fan_out: FanOut) -> Self {
        Self { connector, fan_out }
    }

    #[must_use]
    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    #[must_use]
    pub fn fan_out(&self) -> FanOut {
        self.fan_out
    }

    /// Open a connection to every host and run `op` on it.
    pub async fn run<T, F, Fut>(&self, hosts: &[HostId], op: F) -> FleetReport<T>
    where
        F: Fn(Connection) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let op = &op;
        let results = drive(self.fan_out, hosts.iter(), |host| async move {
            let result = match self.connector.open(host).await {
                Ok(connection) => op(connection).await,
                Err(error) => Err(error),
            };
            (host.clone(), result)
        })
        .await;

        let mut report = FleetReport::default();
        for (host, result) in results {
            report.push(host, result);
        }
        report
    }

    /// Run `op` on already-open connections, collecting every failure.
    pub async fn each<'c, T, F, Fut>(&self, connections: &'c [Connection], op: F) -> FleetReport<T>
    where
        F: Fn(&'c Connection) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let op = &op;
        let results = drive(self.fan_out, connections.iter(), |connection| async move {
            (connection.host().clone(), op(connection).await)
        })
        .await;

        let mut report = FleetReport::default();
        for (host, result) in results {
            report.push(host, result);
        }
        report
    }

    /// Run `op` on already-open connections, failing on the first error.
    ///
    /// Sequentially, hosts after the failing one are not attempted. In
    /// parallel every host runs to completion and the first error in host
    /// order is returned.
    pub async fn try_each<'c, T, F, Fut>(&self, connections: &'c [Connection], op: F) -> Result<Vec<T>>
    where
        F: Fn(&'c Connection) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.fan_out {
            FanOut::Sequential => {
                let mut values = Vec::with_capacity(connections.len());
                for connection in connections {
                    values.push(op(connection).await?);
                }
                Ok(values)
            }
            FanOut::Parallel => join_all(connections.iter().map(&op))
                .await
                .into_iter()
                .collect(),
        }
    }
}

/// Await one future per item, sequentially or all at once.
async fn drive<I, T, F, Fut>(fan_out: FanOut, items: I, f: F) -> Vec<T>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    match fan_out {
        FanOut::Sequential => {
            let mut out = Vec::new();
            for item in items {
                out.push(f(item).await);
            }
            out
        }
        FanOut::Parallel => join_all(items.into_iter().map(f)).await,
    }
}
