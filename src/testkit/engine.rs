//! In-memory container engine for orchestration tests.
//!
//! [`ScriptedEngine`] plays the role of every host's engine at once. Each
//! host gets its own container table and call log; failures are queued per
//! host and consumed by the next matching call. All state sits behind one
//! lock so the global call order across hosts is observable too.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::container::{ContainerSpec, ImageRef};
use crate::domain::host::Endpoint;
use crate::domain::id::ContainerId;
use crate::error::EngineError;
use crate::port::outbound::engine::{ContainerSummary, EngineClient, EngineConnector};

/// One call received by a scripted engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// Create with the container name.
    Create(String),
    /// Pull of `repository:tag`.
    Pull(String),
    /// Start with the container id.
    Start(String),
    /// Remove with the container name.
    Remove(String),
    List,
}

#[derive(Debug, Clone)]
struct Container {
    id: ContainerId,
    image: String,
    running: bool,
}

#[derive(Default)]
struct HostState {
    calls: Vec<EngineCall>,
    create_failures: VecDeque<EngineError>,
    start_failures: VecDeque<EngineError>,
    pull_failures: VecDeque<EngineError>,
    remove_failures: HashMap<String, EngineError>,
    containers: BTreeMap<String, Container>,
    commands: Vec<(String, Vec<String>)>,
}

#[derive(Default)]
struct State {
    hosts: HashMap<String, HostState>,
    refused: HashSet<String>,
    order: Vec<(String, EngineCall)>,
    next_id: u64,
}

impl State {
    fn host(&mut self, host: &str) -> &mut HostState {
        self.hosts.entry(host.to_string()).or_default()
    }

    fn record(&mut self, host: &str, call: EngineCall) {
        self.order.push((host.to_string(), call.clone()));
        self.host(host).calls.push(call);
    }

    fn fresh_id(&mut self) -> ContainerId {
        self.next_id += 1;
        ContainerId::new(format!("{:064x}", self.next_id))
    }
}

/// Scripted engine shared by every host of a test.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    state: Arc<Mutex<State>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client bound to one host.
    pub fn client(&self, host: &str) -> Arc<dyn EngineClient> {
        Arc::new(ScriptedClient {
            host: host.to_string(),
            state: Arc::clone(&self.state),
        })
    }

    /// Fail the next create on `host` with `error`. Calls queue up.
    pub fn fail_create(&self, host: &str, error: EngineError) {
        self.state.lock().host(host).create_failures.push_back(error);
    }

    /// Fail the next start on `host` with `error`.
    pub fn fail_start(&self, host: &str, error: EngineError) {
        self.state.lock().host(host).start_failures.push_back(error);
    }

    /// Fail the next pull on `host` with `error`.
    pub fn fail_pull(&self, host: &str, error: EngineError) {
        self.state.lock().host(host).pull_failures.push_back(error);
    }

    /// Fail every removal of `name` on `host` with `error`.
    pub fn fail_remove(&self, host: &str, name: &str, error: EngineError) {
        self.state
            .lock()
            .host(host)
            .remove_failures
            .insert(name.to_string(), error);
    }

    /// Make [`EngineConnector::connect`] fail for `host`.
    pub fn refuse_connect(&self, host: &str) {
        self.state.lock().refused.insert(host.to_string());
    }

    /// Pretend a running container called `name` already exists on `host`.
    pub fn seed_container(&self, host: &str, name: &str) {
        let mut state = self.state.lock();
        let id = state.fresh_id();
        state.host(host).containers.insert(
            name.to_string(),
            Container {
                id,
                image: "seeded:latest".to_string(),
                running: true,
            },
        );
    }

    /// Every call across all hosts, in the order received.
    pub fn calls(&self) -> Vec<(String, EngineCall)> {
        self.state.lock().order.clone()
    }

    /// Calls received by one host.
    pub fn calls_for(&self, host: &str) -> Vec<EngineCall> {
        self.state
            .lock()
            .hosts
            .get(host)
            .map(|h| h.calls.clone())
            .unwrap_or_default()
    }

    /// Names of containers created on `host`, in call order.
    pub fn created(&self, host: &str) -> Vec<String> {
        self.calls_for(host)
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Create(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Command of the latest create of `name` on `host`, failed or not.
    pub fn command(&self, host: &str, name: &str) -> Option<Vec<String>> {
        self.state.lock().hosts.get(host).and_then(|h| {
            h.commands
                .iter()
                .rev()
                .find(|(created, _)| created == name)
                .map(|(_, command)| command.clone())
        })
    }

    /// Names of running containers on `host`, sorted.
    pub fn running(&self, host: &str) -> Vec<String> {
        self.state
            .lock()
            .hosts
            .get(host)
            .map(|h| {
                h.containers
                    .iter()
                    .filter(|(_, c)| c.running)
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Hosts that received at least one call.
    pub fn touched_hosts(&self) -> HashSet<String> {
        self.state
            .lock()
            .order
            .iter()
            .map(|(host, _)| host.clone())
            .collect()
    }
}

impl EngineConnector for ScriptedEngine {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn EngineClient>, EngineError> {
        let host = endpoint.host().as_str();
        if self.state.lock().refused.contains(host) {
            return Err(EngineError::Transport(format!("connection refused by {host}")));
        }
        Ok(self.client(host))
    }
}

struct ScriptedClient {
    host: String,
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl EngineClient for ScriptedClient {
    async fn create_container(
        &self,
        name: &str,
        spec: &ContainerSpec,
    ) -> Result<ContainerId, EngineError> {
        let mut state = self.state.lock();
        state.record(&self.host, EngineCall::Create(name.to_string()));
        state
            .host(&self.host)
            .commands
            .push((name.to_string(), spec.command().to_vec()));

        if let Some(error) = state.host(&self.host).create_failures.pop_front() {
            return Err(error);
        }
        if state.host(&self.host).containers.contains_key(name) {
            return Err(EngineError::Api {
                status: 409,
                message: format!("container name {name} is already in use"),
            });
        }

        let id = state.fresh_id();
        state.host(&self.host).containers.insert(
            name.to_string(),
            Container {
                id: id.clone(),
                image: spec.image().to_string(),
                running: false,
            },
        );
        Ok(id)
    }

    async fn pull_image(&self, image: &ImageRef) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        let reference = format!("{}:{}", image.repository(), image.tag());
        state.record(&self.host, EngineCall::Pull(reference));

        match state.host(&self.host).pull_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        state.record(&self.host, EngineCall::Start(id.as_str().to_string()));

        let host = state.host(&self.host);
        if let Some(error) = host.start_failures.pop_front() {
            return Err(error);
        }
        let container = host
            .containers
            .values_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| EngineError::NotFound {
                name: id.to_string(),
            })?;
        container.running = true;
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        state.record(&self.host, EngineCall::Remove(name.to_string()));

        let host = state.host(&self.host);
        if let Some(error) = host.remove_failures.get(name) {
            return Err(error.clone());
        }
        match host.containers.remove(name) {
            Some(_) => Ok(()),
            None => Err(EngineError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        let mut state = self.state.lock();
        state.record(&self.host, EngineCall::List);

        Ok(state
            .host(&self.host)
            .containers
            .iter()
            .map(|(name, c)| ContainerSummary {
                id: c.id.clone(),
                names: vec![name.clone()],
                image: c.image.clone(),
                state: if c.running { "running" } else { "created" }.to_string(),
                status: String::new(),
                created: None,
            })
            .collect())
    }
}
