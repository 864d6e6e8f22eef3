use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::HostId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors reported by a container engine client.
///
/// Only [`EngineError::ImageNotFound`] raised by a create call is treated as
/// recoverable (pull, then create once more).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("image not found: {image}")]
    ImageNotFound { image: String },

    #[error("no such container: {name}")]
    NotFound { name: String },

    #[error("engine returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("engine transport error: {0}")]
    Transport(String),
}

/// A failure attributed to a single host during a fan-out.
#[derive(Debug, Clone)]
pub struct HostFailure {
    pub host: HostId,
    pub reason: String,
}

impl std::fmt::Display for HostFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.host, self.reason)
    }
}

fn list_failures(failures: &[HostFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("cannot resolve host {host}: {reason}")]
    Resolution { host: HostId, reason: String },

    #[error("cannot reach engine on {host}: {source}")]
    Transport {
        host: HostId,
        #[source]
        source: EngineError,
    },

    #[error("failed to run {container} on {host}: {source}")]
    Creation {
        host: HostId,
        container: String,
        #[source]
        source: EngineError,
    },

    #[error("engine request on {host} failed: {source}")]
    Engine {
        host: HostId,
        #[source]
        source: EngineError,
    },

    #[error(
        "cluster formation incomplete: {joined} of {expected} hosts joined ({})",
        list_failures(.failures)
    )]
    IncompleteQuorum {
        joined: usize,
        expected: usize,
        failures: Vec<HostFailure>,
    },

    #[error("service launch failed on {} host(s) ({})", .failures.len(), list_failures(.failures))]
    ServiceLaunch { failures: Vec<HostFailure> },

    #[error("failed to persist membership of {host}: {reason}")]
    Persist { host: HostId, reason: String },

    #[error("failed to start machine {host}: {reason}")]
    Machine { host: HostId, reason: String },

    #[error("no hosts given")]
    NoHosts,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Host the error is attributed to, if any.
    #[must_use]
    pub fn host(&self) -> Option<&HostId> {
        match self {
            Self::Resolution { host, .. }
            | Self::Transport { host, .. }
            | Self::Creation { host, .. }
            | Self::Engine { host, .. }
            | Self::Persist { host, .. }
            | Self::Machine { host, .. } => Some(host),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
