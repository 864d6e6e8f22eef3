//! `EngineClient` over one Docker engine.

use async_trait::async_trait;
use bollard::container::{
    CreateContainerOptions, ListContainersOptions, RemoveContainerOptions, StartContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::Docker;
use futures_util::StreamExt;
use tracing::{debug, info};

use super::convert;
use crate::domain::container::{ContainerSpec, ImageRef};
use crate::domain::id::ContainerId;
use crate::error::EngineError;
use crate::port::outbound::engine::{ContainerSummary, EngineClient};

/// Engine client bound to one host.
#[derive(Clone)]
pub struct DockerEngine {
    docker: Docker,
    host: String,
}

impl DockerEngine {
    #[must_use]
    pub fn new(docker: Docker, host: impl Into<String>) -> Self {
        Self {
            docker,
            host: host.into(),
        }
    }
}

#[async_trait]
impl EngineClient for DockerEngine {
    async fn create_container(
        &self,
        name: &str,
        spec: &ContainerSpec,
    ) -> Result<ContainerId, EngineError> {
        let options = CreateContainerOptions {
            name: name.to_string(),
            platform: None,
        };

        let response = self
            .docker
            .create_container(Some(options), convert::container_config(spec))
            .await
            .map_err(|e| convert::create_error(e, &spec.image().to_string()))?;

        for warning in &response.warnings {
            debug!(host = %self.host, container = name, warning = %warning, "Engine warning");
        }
        Ok(ContainerId::new(response.id))
    }

    async fn pull_image(&self, image: &ImageRef) -> Result<(), EngineError> {
        info!(host = %self.host, image = %image, "Pulling image");

        let options = CreateImageOptions {
            from_image: image.repository().to_string(),
            tag: image.tag().to_string(),
            ..Default::default()
        };

        let mut stream = self.docker.create_image(Some(options), None, None);

        while let Some(result) = stream.next().await {
            let progress = result.map_err(convert::engine_error)?;
            if let Some(status) = progress.status {
                debug!(host = %self.host, status = %status, "Pull progress");
            }
        }

        Ok(())
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), EngineError> {
        self.docker
            .start_container(id.as_str(), None::<StartContainerOptions<String>>)
            .await
            .map_err(convert::engine_error)
    }

    async fn remove_container(&self, name: &str) -> Result<(), EngineError> {
        let options = RemoveContainerOptions {
            force: true,
            v: true,
            ..Default::default()
        };

        self.docker
            .remove_container(name, Some(options))
            .await
            .map_err(|e| convert::remove_error(e, name))
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };

        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(convert::engine_error)?;

        Ok(containers.into_iter().map(convert::summary).collect())
    }
}
