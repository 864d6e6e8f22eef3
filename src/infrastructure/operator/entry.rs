//! Operator wiring: configuration to orchestrator.

use std::sync::Arc;

use crate::adapter::outbound::docker::connector::DockerConnector;
use crate::adapter::outbound::machine::store::MachineStore;
use crate::application::cluster::orchestrator::ClusterOrchestrator;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::cluster::ClusterRequest;
use crate::port::inbound::operator::port::OperatorPort;
use crate::port::outbound::directory::HostDirectory;
use crate::port::outbound::engine::EngineConnector;

enum Adapters {
    /// docker-machine store and Docker engines, located from configuration.
    Machine,
    /// Injected adapters, configuration only drives the catalog.
    Fixed {
        directory: Arc<dyn HostDirectory>,
        engines: Arc<dyn EngineConnector>,
    },
}

/// Operator implementation backing CLI use cases.
///
/// Each request carries its own configuration, so an orchestrator is built
/// per call and never outlives the command.
pub struct Operator {
    adapters: Adapters,
}

impl Default for Operator {
    fn default() -> Self {
        Self {
            adapters: Adapters::Machine,
        }
    }
}

impl Operator {
    /// Operator over the given directory and engine connector.
    #[must_use]
    pub fn with_adapters(
        directory: Arc<dyn HostDirectory>,
        engines: Arc<dyn EngineConnector>,
    ) -> Self {
        Self {
            adapters: Adapters::Fixed { directory, engines },
        }
    }

    pub(super) fn config(request: &ClusterRequest) -> Result<Config> {
        Config::from_optional_toml(request.config_toml.as_deref())
    }

    pub(super) fn orchestrator(&self, request: &ClusterRequest) -> Result<ClusterOrchestrator> {
        let config = Self::config(request)?;
        let catalog = config.catalog()?;

        let (directory, engines): (Arc<dyn HostDirectory>, Arc<dyn EngineConnector>) =
            match &self.adapters {
                Adapters::Machine => (
                    Arc::new(MachineStore::new(
                        config.machine.storage_path(),
                        config.ports.engine,
                        config.machine.binary.clone(),
                    )),
                    Arc::new(DockerConnector::default()),
                ),
                Adapters::Fixed { directory, engines } => {
                    (Arc::clone(directory), Arc::clone(engines))
                }
            };

        Ok(ClusterOrchestrator::new(
            catalog,
            directory,
            engines,
            config.launch_settings(),
        ))
    }
}

/// Build the default operator implementation for inbound adapters.
#[must_use]
pub fn operator() -> Box<dyn OperatorPort> {
    Box::new(Operator::default())
}
