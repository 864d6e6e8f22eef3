//! Translation between domain container types and `bollard` models.

use std::collections::HashMap;

use bollard::container::Config;
use bollard::errors::Error as DockerError;
use bollard::models::{
    ContainerSummary as DockerSummary, HostConfig, HostConfigLogConfig, PortBinding,
    RestartPolicy as DockerRestartPolicy, RestartPolicyNameEnum,
};
use chrono::DateTime;

use crate::domain::container::{ContainerSpec, RestartPolicy};
use crate::domain::id::ContainerId;
use crate::error::EngineError;
use crate::port::outbound::engine::ContainerSummary;

const NOT_FOUND: u16 = 404;

/// Create request body for a spec.
#[must_use]
pub fn container_config(spec: &ContainerSpec) -> Config<String> {
    let port_key = |port: u16| format!("{port}/tcp");

    let exposed_ports: HashMap<String, HashMap<(), ()>> = spec
        .port_bindings()
        .iter()
        .map(|p| (port_key(p.container_port), HashMap::new()))
        .collect();

    let port_bindings: HashMap<String, Option<Vec<PortBinding>>> = spec
        .port_bindings()
        .iter()
        .map(|p| {
            let binding = PortBinding {
                host_ip: None,
                host_port: Some(p.host_port.to_string()),
            };
            (port_key(p.container_port), Some(vec![binding]))
        })
        .collect();

    let log = spec.log_policy();
    let log_config = HostConfigLogConfig {
        typ: Some(log.driver.clone()),
        config: Some(log.options.clone().into_iter().collect()),
    };

    let restart_policy = DockerRestartPolicy {
        name: Some(match spec.restart_policy() {
            RestartPolicy::No => RestartPolicyNameEnum::NO,
            RestartPolicy::Always => RestartPolicyNameEnum::ALWAYS,
        }),
        maximum_retry_count: None,
    };

    let host_config = HostConfig {
        binds: non_empty(spec.binds().to_vec()),
        network_mode: spec.network_mode().as_engine_str().map(str::to_string),
        port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
        log_config: Some(log_config),
        restart_policy: Some(restart_policy),
        ..Default::default()
    };

    Config {
        image: Some(spec.image().to_string()),
        cmd: non_empty(spec.command().to_vec()),
        exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
        host_config: Some(host_config),
        ..Default::default()
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

/// Map a create error; a 404 means the image is missing locally.
#[must_use]
pub fn create_error(error: DockerError, image: &str) -> EngineError {
    match error {
        DockerError::DockerResponseServerError {
            status_code: NOT_FOUND,
            ..
        } => EngineError::ImageNotFound {
            image: image.to_string(),
        },
        other => engine_error(other),
    }
}

/// Map a remove error; a 404 means no container had the name.
#[must_use]
pub fn remove_error(error: DockerError, name: &str) -> EngineError {
    match error {
        DockerError::DockerResponseServerError {
            status_code: NOT_FOUND,
            ..
        } => EngineError::NotFound {
            name: name.to_string(),
        },
        other => engine_error(other),
    }
}

/// Map any other engine error.
#[must_use]
pub fn engine_error(error: DockerError) -> EngineError {
    match error {
        DockerError::DockerResponseServerError {
            status_code,
            message,
        } => EngineError::Api {
            status: status_code,
            message,
        },
        other => EngineError::Transport(other.to_string()),
    }
}

/// Listed container from the engine's summary.
#[must_use]
pub fn summary(container: DockerSummary) -> ContainerSummary {
    ContainerSummary {
        id: ContainerId::new(container.id.unwrap_or_default()),
        names: container
            .names
            .unwrap_or_default()
            .into_iter()
            .map(|n| n.trim_start_matches('/').to_string())
            .collect(),
        image: container.image.unwrap_or_default(),
        state: container.state.unwrap_or_default(),
        status: container.status.unwrap_or_default(),
        created: container
            .created
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
    }
}
