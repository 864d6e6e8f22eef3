//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. Every
//! section is optional; an empty file yields a cluster named `barney` made
//! of the stock consul, swarm and registrator images.
//!
//! # Example
//!
//! ```no_run
//! use clusterator::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::application::settings::{FanOut, LaunchSettings, ServiceFailurePolicy};
use crate::domain::container::ImageRef;
use crate::domain::discovery::{
    ClusterName, DiscoveryTopology, DEFAULT_BACKEND_PORT, DEFAULT_CLUSTER_PORT, DEFAULT_SCHEME,
};
use crate::domain::service::{
    ServiceCatalog, ServiceImages, DEFAULT_CERTIFICATE_DIR, DEFAULT_ENGINE_PORT,
    DEFAULT_MANAGEMENT_PORT,
};
use crate::error::{ConfigError, Result};

/// Environment variable docker-machine reads its store location from.
pub const MACHINE_STORAGE_ENV: &str = "MACHINE_STORAGE_PATH";

/// Cluster identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Discovery namespace shared by every node.
    pub name: ClusterName,
    /// Scheme of the discovery backend URL handed to dependent services.
    pub discovery_scheme: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: ClusterName::default(),
            discovery_scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

/// Images launched for each service role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub discovery: String,
    pub scheduler: String,
    pub registrar: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            discovery: "progrium/consul".to_string(),
            scheduler: "swarm".to_string(),
            registrar: "gliderlabs/registrator".to_string(),
        }
    }
}

/// Well-known ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PortsConfig {
    /// Discovery HTTP API, also the backend URL port.
    pub discovery: u16,
    /// Discovery gossip port joiners connect to.
    pub discovery_cluster: u16,
    /// Container engine TLS port.
    pub engine: u16,
    /// Scheduler master management port.
    pub management: u16,
}

impl Default for PortsConfig {
    fn default() -> Self {
        Self {
            discovery: DEFAULT_BACKEND_PORT,
            discovery_cluster: DEFAULT_CLUSTER_PORT,
            engine: DEFAULT_ENGINE_PORT,
            management: DEFAULT_MANAGEMENT_PORT,
        }
    }
}

/// Launch behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Wait after each container start, in milliseconds. Zero disables it.
    pub settle_delay_ms: u64,
    pub fan_out: FanOut,
    pub service_failure: ServiceFailurePolicy,
    /// Host directory holding the engine's TLS certificates.
    pub certificate_dir: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 500,
            fan_out: FanOut::default(),
            service_failure: ServiceFailurePolicy::default(),
            certificate_dir: DEFAULT_CERTIFICATE_DIR.to_string(),
        }
    }
}

/// Location of the docker-machine store and binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Store root; see [`MachineConfig::storage_path`] for the fallback.
    pub storage_path: Option<PathBuf>,
    /// Binary invoked to start machines.
    pub binary: String,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            binary: "docker-machine".to_string(),
        }
    }
}

impl MachineConfig {
    /// Configured store root, else `$MACHINE_STORAGE_PATH`, else
    /// `~/.docker/machine`.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }
        if let Some(path) = std::env::var_os(MACHINE_STORAGE_ENV) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docker")
            .join("machine")
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub ports: PortsConfig,

    #[serde(default)]
    pub launch: LaunchConfig,

    #[serde(default)]
    pub machine: MachineConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Parse `content` when present, otherwise use the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::parse_toml`].
    #[allow(clippy::result_large_err)]
    pub fn from_optional_toml(content: Option<&str>) -> Result<Self> {
        match content {
            Some(content) => Self::parse_toml(content),
            None => Ok(Self::default()),
        }
    }

    /// Initialize tracing with the configured logging settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.cluster.discovery_scheme.is_empty() {
            return Err(ConfigError::MissingField {
                field: "cluster.discovery_scheme",
            }
            .into());
        }
        url::Url::parse(&self.topology().backend_url("localhost")).map_err(|e| {
            ConfigError::InvalidValue {
                field: "cluster.discovery_scheme",
                reason: e.to_string(),
            }
        })?;

        for (field, reference) in [
            ("images.discovery", &self.images.discovery),
            ("images.scheduler", &self.images.scheduler),
            ("images.registrar", &self.images.registrar),
        ] {
            ImageRef::parse(reference).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })?;
        }

        let ports = [
            ("ports.discovery", self.ports.discovery),
            ("ports.discovery_cluster", self.ports.discovery_cluster),
            ("ports.engine", self.ports.engine),
            ("ports.management", self.ports.management),
        ];
        for (i, &(field, port)) in ports.iter().enumerate() {
            if port == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
            if let Some((other, _)) = ports[..i].iter().find(|(_, p)| *p == port) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must differ from {other}"),
                }
                .into());
            }
        }

        if self.machine.binary.is_empty() {
            return Err(ConfigError::MissingField {
                field: "machine.binary",
            }
            .into());
        }

        Ok(())
    }

    /// Discovery naming and ports.
    #[must_use]
    pub fn topology(&self) -> DiscoveryTopology {
        DiscoveryTopology {
            cluster: self.cluster.name.clone(),
            scheme: self.cluster.discovery_scheme.clone(),
            backend_port: self.ports.discovery,
            cluster_port: self.ports.discovery_cluster,
        }
    }

    /// Container specification catalog for every service role.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unparsable image.
    #[allow(clippy::result_large_err)]
    pub fn catalog(&self) -> Result<ServiceCatalog> {
        let image = |field, reference: &str| {
            ImageRef::parse(reference).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })
        };

        Ok(ServiceCatalog {
            images: ServiceImages {
                discovery: image("images.discovery", &self.images.discovery)?,
                scheduler: image("images.scheduler", &self.images.scheduler)?,
                registrar: image("images.registrar", &self.images.registrar)?,
            },
            topology: self.topology(),
            management_port: self.ports.management,
            certificate_dir: self.launch.certificate_dir.clone(),
        })
    }

    /// Launch behavior for the orchestrator.
    #[must_use]
    pub fn launch_settings(&self) -> LaunchSettings {
        LaunchSettings {
            settle_delay: Duration::from_millis(self.launch.settle_delay_ms),
            fan_out: self.launch.fan_out,
            service_failure: self.launch.service_failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cluster.name.as_str(), "barney");
        assert_eq!(config.launch_settings(), LaunchSettings::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse_toml(
            r#"
            [cluster]
            name = "fred"

            [ports]
            management = 4376

            [launch]
            settle_delay_ms = 0
            fan_out = "parallel"
            service_failure = "continue"
            "#,
        )
        .unwrap();

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.topology.backend_url("10.0.0.5"), "consul://10.0.0.5:8500/fred");
        assert_eq!(catalog.management_port, 4376);

        let launch = config.launch_settings();
        assert!(launch.settle_delay.is_zero());
        assert_eq!(launch.fan_out, FanOut::Parallel);
        assert_eq!(launch.service_failure, ServiceFailurePolicy::Continue);
    }

    #[test]
    fn invalid_cluster_name_is_a_parse_error() {
        let result = Config::parse_toml("[cluster]\nname = \"a/b\"\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn colliding_ports_are_rejected() {
        let result = Config::parse_toml("[ports]\nmanagement = 8500\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "ports.management", .. }))
        ));
    }

    #[test]
    fn empty_image_is_rejected() {
        let result = Config::parse_toml("[images]\nregistrar = \"\"\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "images.registrar", .. }))
        ));
    }

    #[test]
    fn unusable_scheme_is_rejected() {
        let result = Config::parse_toml("[cluster]\ndiscovery_scheme = \"con sul\"\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "cluster.discovery_scheme", .. }))
        ));
    }

    #[test]
    fn explicit_storage_path_wins() {
        let machine = MachineConfig {
            storage_path: Some(PathBuf::from("/srv/machines")),
            ..MachineConfig::default()
        };
        assert_eq!(machine.storage_path(), PathBuf::from("/srv/machines"));
    }

    #[test]
    fn missing_content_uses_defaults() {
        assert_eq!(Config::from_optional_toml(None).unwrap(), Config::default());
    }
}
