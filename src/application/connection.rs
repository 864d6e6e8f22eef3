//! Connection to one host's container engine.
//!
//! A [`Connection`] pairs a resolved [`Endpoint`] with an engine client and
//! adds the two lifecycle protocols the orchestrator relies on:
//!
//! - **run**: create; on a missing image pull it and create once more; then
//!   start and wait for the settle delay.
//! - **forced removal**: remove every named container, recording a
//!   per-name outcome instead of failing.
//!
//! Connections are opened per command through a [`Connector`] and never
//! cached across runs.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::container::ContainerSpec;
use crate::domain::discovery::DiscoveryTopology;
use crate::domain::host::{Endpoint, HostId};
use crate::domain::id::ContainerId;
use crate::error::{EngineError, Error, Result};
use crate::port::outbound::directory::HostDirectory;
use crate::port::outbound::engine::{ContainerSummary, EngineClient, EngineConnector};

/// What happened to one container name during forced removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The container existed and was removed.
    Removed,
    /// No container had that name.
    Absent,
    /// The engine refused or could not be reached.
    Failed(EngineError),
}

/// Outcome of removing one container name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub name: String,
    pub outcome: RemovalOutcome,
}

impl Removal {
    /// True unless the engine reported an error other than absence.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        !matches!(self.outcome, RemovalOutcome::Failed(_))
    }
}

/// Engine capability bound to exactly one host.
#[derive(Clone)]
pub struct Connection {
    endpoint: Endpoint,
    client: Arc<dyn EngineClient>,
    settle_delay: Duration,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Bind a client to an endpoint.
    ///
    /// `settle_delay` is waited after every successful start. It is a
    /// readiness heuristic only; zero disables it.
    #[must_use]
    pub fn new(endpoint: Endpoint, client: Arc<dyn EngineClient>, settle_delay: Duration) -> Self {
        Self {
            endpoint,
            client,
            settle_delay,
        }
    }

    #[must_use]
    pub fn host(&self) -> &HostId {
        self.endpoint.host()
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Bare address of the host.
    #[must_use]
    pub fn address(&self) -> &str {
        self.endpoint.address()
    }

    /// `address:port` for a service on this host.
    #[must_use]
    pub fn advertise_address(&self, port: u16) -> String {
        format!("{}:{port}", self.endpoint.address())
    }

    /// Backend URL of a discovery agent running on this host.
    #[must_use]
    pub fn discovery_url(&self, topology: &DiscoveryTopology) -> String {
        topology.backend_url(self.endpoint.address())
    }

    /// Create and start a container, pulling its image on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Creation`] when create (including the single retry
    /// after a pull), the pull itself, or start fails.
    pub async fn run_image(&self, name: &str, spec: &ContainerSpec) -> Result<ContainerId> {
        let creation = |source| Error::Creation {
            host: self.host().clone(),
            container: name.to_string(),
            source,
        };

        let id = self.create_pulling_on_miss(name, spec).await.map_err(creation)?;
        info!(
            host = %self.host(),
            container = name,
            id = %id.short(),
            "Created container"
        );

        self.client.start_container(&id).await.map_err(creation)?;
        debug!(host = %self.host(), container = name, "Started container");

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        Ok(id)
    }

    /// Create; on [`EngineError::ImageNotFound`] pull and create exactly once more.
    async fn create_pulling_on_miss(
        &self,
        name: &str,
        spec: &ContainerSpec,
    ) -> std::result::Result<ContainerId, EngineError> {
        match self.client.create_container(name, spec).await {
            Err(EngineError::ImageNotFound { .. }) => {
                info!(
                    host = %self.host(),
                    image = %spec.image(),
                    "Image missing, pulling"
                );
                self.client.pull_image(spec.image()).await?;
                self.client.create_container(name, spec).await
            }
            other => other,
        }
    }

    /// Forcibly remove each named container with its volumes.
    ///
    /// Every name is attempted; failures are logged and reported in the
    /// returned outcomes rather than returned as an error.
    pub async fn remove_forcibly(&self, names: &[&str]) -> Vec<Removal> {
        let mut removals = Vec::with_capacity(names.len());

        for name in names {
            let outcome = match self.client.remove_container(name).await {
                Ok(()) => {
                    info!(host = %self.host(), container = name, "Removed container");
                    RemovalOutcome::Removed
                }
                Err(EngineError::NotFound { .. }) => {
                    debug!(host = %self.host(), container = name, "Container absent");
                    RemovalOutcome::Absent
                }
                Err(error) => {
                    warn!(
                        host = %self.host(),
                        container = name,
                        error = %error,
                        "Failed to remove container"
                    );
                    RemovalOutcome::Failed(error)
                }
            };
            removals.push(Removal {
                name: (*name).to_string(),
                outcome,
            });
        }

        removals
    }

    /// List every container on the host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] when the engine cannot list containers.
    pub async fn containers(&self) -> Result<Vec<ContainerSummary>> {
        self.client
            .list_containers()
            .await
            .map_err(|source| Error::Engine {
                host: self.host().clone(),
                source,
            })
    }
}

/// Opens [`Connection`]s by resolving hosts through the directory.
#[derive(Clone)]
pub struct Connector {
    directory: Arc<dyn HostDirectory>,
    engines: Arc<dyn EngineConnector>,
    settle_delay: Duration,
}

impl Connector {
    #[must_use]
    pub fn new(
        directory: Arc<dyn HostDirectory>,
        engines: Arc<dyn EngineConnector>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            directory,
            engines,
            settle_delay,
        }
    }

    /// The directory hosts are resolved through.
    #[must_use]
    pub fn directory(&self) -> &Arc<dyn HostDirectory> {
        &self.directory
    }

    /// Resolve a host and bind an engine client to it.
    ///
    /// # Errors
    ///
    /// [`Error::Resolution`] when the directory cannot resolve the host,
    /// [`Error::Transport`] when no client can be built for its endpoint.
    pub async fn open(&self, host: &HostId) -> Result<Connection> {
        let endpoint = self.directory.resolve(host).await?;
        let client = self
            .engines
            .connect(&endpoint)
            .map_err(|source| Error::Transport {
                host: host.clone(),
                source,
            })?;
        debug!(host = %host, url = endpoint.url(), "Opened engine connection");
        Ok(Connection::new(endpoint, client, self.settle_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::container::ImageRef;
    use crate::testkit::engine::{EngineCall, ScriptedEngine};

    fn connection(engine: &Arc<ScriptedEngine>) -> Connection {
        let endpoint = Endpoint::parse(HostId::new("node-1"), "tcp://10.0.0.5:2376", None).unwrap();
        Connection::new(endpoint, engine.client("node-1"), Duration::ZERO)
    }

    fn spec() -> ContainerSpec {
        ContainerSpec::new(ImageRef::parse("progrium/consul").unwrap())
    }

    #[tokio::test]
    async fn run_image_creates_then_starts() {
        let engine = Arc::new(ScriptedEngine::new());
        let conn = connection(&engine);

        let id = conn.run_image("c1", &spec()).await.unwrap();

        let calls = engine.calls_for("node-1");
        assert_eq!(
            calls,
            vec![
                EngineCall::Create("c1".into()),
                EngineCall::Start(id.as_str().to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn missing_image_pulls_once_and_retries_once() {
        let engine = Arc::new(ScriptedEngine::new());
        engine.fail_create("node-1", EngineError::ImageNotFound { image: "progrium/consul".into() });
        let conn = connection(&engine);

        conn.run_image("c1", &spec()).await.unwrap();

        let calls = engine.calls_for("node-1");
        assert_eq!(calls.iter().filter(|c| matches!(c, EngineCall::Pull(_))).count(), 1);
        assert_eq!(calls.iter().filter(|c| matches!(c, EngineCall::Create(_))).count(), 2);
        assert_eq!(calls[1], EngineCall::Pull("progrium/consul:latest".into()));
    }

    #[tokio::test]
    async fn second_missing_image_is_a_creation_error() {
        let engine = Arc::new(ScriptedEngine::new());
        let missing = EngineError::ImageNotFound { image: "progrium/consul".into() };
        engine.fail_create("node-1", missing.clone());
        engine.fail_create("node-1", missing);
        let conn = connection(&engine);

        let err = conn.run_image("c1", &spec()).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Creation { source: EngineError::ImageNotFound { .. }, .. }
        ));
        let calls = engine.calls_for("node-1");
        assert_eq!(calls.iter().filter(|c| matches!(c, EngineCall::Create(_))).count(), 2);
        assert!(!calls.iter().any(|c| matches!(c, EngineCall::Start(_))));
    }

    #[tokio::test]
    async fn other_create_errors_are_not_retried() {
        let engine = Arc::new(ScriptedEngine::new());
        engine.fail_create(
            "node-1",
            EngineError::Api { status: 409, message: "name in use".into() },
        );
        let conn = connection(&engine);

        let err = conn.run_image("c1", &spec()).await.unwrap_err();

        assert!(matches!(err, Error::Creation { source: EngineError::Api { status: 409, .. }, .. }));
        assert_eq!(engine.calls_for("node-1").len(), 1);
    }

    #[tokio::test]
    async fn removal_continues_past_failures() {
        let engine = Arc::new(ScriptedEngine::new());
        engine.fail_remove("node-1", "a", EngineError::Transport("reset".into()));
        let conn = connection(&engine);

        let removals = conn.remove_forcibly(&["a", "b"]).await;

        assert_eq!(removals.len(), 2);
        assert!(matches!(removals[0].outcome, RemovalOutcome::Failed(_)));
        assert_eq!(engine.calls_for("node-1").len(), 2);
    }

    #[tokio::test]
    async fn removal_of_absent_containers_is_not_an_error() {
        let engine = Arc::new(ScriptedEngine::new());
        let conn = connection(&engine);

        let removals = conn.remove_forcibly(&["a", "b"]).await;

        assert!(removals.iter().all(Removal::is_ok));
        assert!(removals.iter().all(|r| r.outcome == RemovalOutcome::Absent));
    }

    #[test]
    fn advertise_and_discovery_urls_use_host_address() {
        let engine = Arc::new(ScriptedEngine::new());
        let conn = connection(&engine);
        assert_eq!(conn.advertise_address(3376), "10.0.0.5:3376");
        assert_eq!(
            conn.discovery_url(&DiscoveryTopology::default()),
            "consul://10.0.0.5:8500/barney"
        );
    }
}
