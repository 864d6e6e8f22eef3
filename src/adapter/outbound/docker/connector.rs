//! Builds Docker engine clients for resolved endpoints.

use std::sync::Arc;

use bollard::{Docker, API_DEFAULT_VERSION};

use super::client::DockerEngine;
use crate::domain::host::Endpoint;
use crate::error::EngineError;
use crate::port::outbound::engine::{EngineClient, EngineConnector};

/// Default request timeout in seconds. Image pulls run under it too.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Connector choosing TLS when the endpoint carries certificates.
#[derive(Debug, Clone, Copy)]
pub struct DockerConnector {
    timeout_secs: u64,
}

impl DockerConnector {
    #[must_use]
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

impl Default for DockerConnector {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS)
    }
}

impl EngineConnector for DockerConnector {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn EngineClient>, EngineError> {
        let docker = match endpoint.tls() {
            Some(tls) => Docker::connect_with_ssl(
                endpoint.url(),
                &tls.client_key,
                &tls.client_cert,
                &tls.ca_cert,
                self.timeout_secs,
                API_DEFAULT_VERSION,
            ),
            None => Docker::connect_with_http(endpoint.url(), self.timeout_secs, API_DEFAULT_VERSION),
        }
        .map_err(|e| EngineError::Transport(e.to_string()))?;

        Ok(Arc::new(DockerEngine::new(docker, endpoint.host().as_str())))
    }
}
