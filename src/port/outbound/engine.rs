//! Container engine port.
//!
//! Wire-level create/start/remove/list/pull calls against one engine. The
//! orchestration logic (pull-on-miss, settle delay, best-effort removal)
//! lives in the application layer on top of this contract.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::container::{ContainerSpec, ImageRef};
use crate::domain::host::Endpoint;
use crate::domain::id::ContainerId;
use crate::error::EngineError;

/// Container as listed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub id: ContainerId,
    pub names: Vec<String>,
    pub image: String,
    pub state: String,
    pub status: String,
    pub created: Option<DateTime<Utc>>,
}

/// Client bound to a single engine.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Create (but do not start) a container with a fixed name.
    ///
    /// # Errors
    ///
    /// Must return [`EngineError::ImageNotFound`] when the image is not
    /// present locally, so the caller can pull and retry.
    async fn create_container(
        &self,
        name: &str,
        spec: &ContainerSpec,
    ) -> Result<ContainerId, EngineError>;

    /// Pull an image, consuming its progress stream.
    async fn pull_image(&self, image: &ImageRef) -> Result<(), EngineError>;

    /// Start a created container.
    async fn start_container(&self, id: &ContainerId) -> Result<(), EngineError>;

    /// Forcibly remove a container and its volumes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] when no such container exists.
    async fn remove_container(&self, name: &str) -> Result<(), EngineError>;

    /// List all containers, running or not.
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError>;
}

/// Builds engine clients for resolved endpoints.
pub trait EngineConnector: Send + Sync {
    /// Build a client for the endpoint. Does not contact the engine.
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn EngineClient>, EngineError>;
}
