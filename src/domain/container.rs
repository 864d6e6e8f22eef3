//! Engine-agnostic container specifications.
//!
//! A [`ContainerSpec`] is assembled once per launch with the consuming
//! builder methods and then only read. Outbound engine adapters translate it
//! into their own request types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Tag pulled when a reference does not name one.
pub const DEFAULT_TAG: &str = "latest";

/// Image reference split into repository and tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    repository: String,
    tag: Option<String>,
}

impl ImageRef {
    /// Parse `repository[:tag]`.
    ///
    /// A colon inside the registry host (`registry:5000/name`) is not taken
    /// as a tag separator.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidImage`] for an empty repository.
    pub fn parse(reference: &str) -> Result<Self, DomainError> {
        let reference = reference.trim();
        let last_segment_start = reference.rfind('/').map_or(0, |i| i + 1);
        let (repository, tag) = match reference[last_segment_start..].rfind(':') {
            Some(i) => {
                let split = last_segment_start + i;
                (&reference[..split], Some(&reference[split + 1..]))
            }
            None => (reference, None),
        };

        if repository.is_empty() || tag == Some("") {
            return Err(DomainError::InvalidImage {
                reference: reference.to_string(),
            });
        }

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.map(str::to_string),
        })
    }

    /// Repository without tag.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Tag to pull; `latest` when none was given.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(DEFAULT_TAG)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{}:{tag}", self.repository),
            None => write!(f, "{}", self.repository),
        }
    }
}

/// Network namespace the container joins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NetworkMode {
    /// Engine default bridge network.
    #[default]
    Default,
    /// Share the host's network namespace.
    Host,
}

impl NetworkMode {
    /// Engine-level name, if any.
    #[must_use]
    pub fn as_engine_str(&self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Host => Some("host"),
        }
    }
}

/// Restart policy applied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// Never restart.
    #[default]
    No,
    /// Always restart, including after engine restarts.
    Always,
}

/// Log driver and rotation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPolicy {
    /// Log driver name.
    pub driver: String,
    /// Driver options.
    pub options: BTreeMap<String, String>,
}

impl LogPolicy {
    /// `json-file` rotating at `max_size` and keeping `max_files` files.
    #[must_use]
    pub fn rotating_json(max_size: &str, max_files: u32) -> Self {
        let mut options = BTreeMap::new();
        options.insert("max-size".to_string(), max_size.to_string());
        options.insert("max-file".to_string(), max_files.to_string());
        Self {
            driver: "json-file".to_string(),
            options,
        }
    }
}

impl Default for LogPolicy {
    fn default() -> Self {
        Self::rotating_json("10m", 5)
    }
}

/// Publishes a container TCP port on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBinding {
    /// Port inside the container.
    pub container_port: u16,
    /// Port on the host.
    pub host_port: u16,
}

/// Complete description of one container to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    image: ImageRef,
    command: Vec<String>,
    network_mode: NetworkMode,
    log_policy: LogPolicy,
    restart_policy: RestartPolicy,
    binds: Vec<String>,
    port_bindings: Vec<PortBinding>,
}

impl ContainerSpec {
    /// Start a spec for the given image with default host configuration.
    #[must_use]
    pub fn new(image: ImageRef) -> Self {
        Self {
            image,
            command: Vec::new(),
            network_mode: NetworkMode::default(),
            log_policy: LogPolicy::default(),
            restart_policy: RestartPolicy::default(),
            binds: Vec::new(),
            port_bindings: Vec::new(),
        }
    }

    /// Set the command arguments.
    #[must_use]
    pub fn with_command<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the network mode.
    #[must_use]
    pub fn with_network_mode(mut self, mode: NetworkMode) -> Self {
        self.network_mode = mode;
        self
    }

    /// Set the log policy.
    #[must_use]
    pub fn with_log_policy(mut self, policy: LogPolicy) -> Self {
        self.log_policy = policy;
        self
    }

    /// Set the restart policy.
    #[must_use]
    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart_policy = policy;
        self
    }

    /// Add a `host:container[:mode]` bind.
    #[must_use]
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.binds.push(bind.into());
        self
    }

    /// Publish a container port on the host.
    #[must_use]
    pub fn with_port_binding(mut self, container_port: u16, host_port: u16) -> Self {
        self.port_bindings.push(PortBinding {
            container_port,
            host_port,
        });
        self
    }

    #[must_use]
    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    #[must_use]
    pub fn command(&self) -> &[String] {
        &self.command
    }

    #[must_use]
    pub fn network_mode(&self) -> &NetworkMode {
        &self.network_mode
    }

    #[must_use]
    pub fn log_policy(&self) -> &LogPolicy {
        &self.log_policy
    }

    #[must_use]
    pub fn restart_policy(&self) -> RestartPolicy {
        self.restart_policy
    }

    #[must_use]
    pub fn binds(&self) -> &[String] {
        &self.binds
    }

    #[must_use]
    pub fn port_bindings(&self) -> &[PortBinding] {
        &self.port_bindings
    }
}
