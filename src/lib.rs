//! Clusterator - bootstraps a consul + swarm + registrator cluster across
//! docker-machine hosts.
//!
//! The first host given bootstraps a consul server expecting a strict
//! majority quorum; every other host joins it. Once all hosts have joined,
//! each one receives a swarm agent, a swarm master and a registrator, and
//! its machine record is updated with the cluster's discovery URL.
//!
//! # Architecture
//!
//! - **`domain`** - Container specs, discovery topology and quorum math
//! - **`port`** - Host directory and engine client traits, operator surface
//! - **`application`** - Connections, fleet fan-out, bootstrap, services, teardown
//! - **`adapter`** - bollard engine, docker-machine store, clap CLI
//! - **`infrastructure`** - Configuration, logging and operator wiring
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use clusterator::adapter::outbound::docker::connector::DockerConnector;
//! use clusterator::adapter::outbound::machine::store::MachineStore;
//! use clusterator::application::cluster::orchestrator::ClusterOrchestrator;
//! use clusterator::domain::host::HostId;
//! use clusterator::infrastructure::config::settings::Config;
//!
//! # async fn run() -> clusterator::error::Result<()> {
//! let config = Config::default();
//! let orchestrator = ClusterOrchestrator::new(
//!     config.catalog()?,
//!     Arc::new(MachineStore::new(config.machine.storage_path(), 2376, "docker-machine")),
//!     Arc::new(DockerConnector::default()),
//!     config.launch_settings(),
//! );
//! let hosts = [HostId::new("node-1"), HostId::new("node-2"), HostId::new("node-3")];
//! orchestrator.create(&hosts).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
