//! Container specifications for each service role.
//!
//! [`ServiceCatalog`] holds the cluster-wide settings (images, ports,
//! certificate directory, discovery topology) and builds a fresh
//! [`ContainerSpec`] for every launch. Every spec shares the same
//! log-rotation and restart policy.

use super::container::{ContainerSpec, ImageRef, LogPolicy, NetworkMode, RestartPolicy};
use super::discovery::DiscoveryTopology;

/// Default scheduler-master management port.
pub const DEFAULT_MANAGEMENT_PORT: u16 = 3376;

/// Default engine TLS port.
pub const DEFAULT_ENGINE_PORT: u16 = 2376;

/// Default directory holding the engine's server certificates on a host.
pub const DEFAULT_CERTIFICATE_DIR: &str = "/var/lib/boot2docker";

/// Mount point of the certificate directory inside the scheduler master.
const CERTS_MOUNT: &str = "/certs";

/// Engine control socket on the host.
const ENGINE_SOCKET: &str = "/var/run/docker.sock";

/// Where the registrar expects the engine socket.
const REGISTRAR_SOCKET: &str = "/tmp/docker.sock";

/// Images used for each role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceImages {
    pub discovery: ImageRef,
    pub scheduler: ImageRef,
    pub registrar: ImageRef,
}

/// Builds container specifications for every role of one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    pub images: ServiceImages,
    pub topology: DiscoveryTopology,
    pub management_port: u16,
    pub certificate_dir: String,
}

impl ServiceCatalog {
    fn base(&self, image: &ImageRef) -> ContainerSpec {
        ContainerSpec::new(image.clone())
            .with_log_policy(LogPolicy::default())
            .with_restart_policy(RestartPolicy::Always)
    }

    /// Discovery server on the bootstrap node, expecting `quorum` servers.
    #[must_use]
    pub fn discovery_bootstrap(&self, bind_address: &str, quorum: usize) -> ContainerSpec {
        self.base(&self.images.discovery)
            .with_network_mode(NetworkMode::Host)
            .with_command([
                "-server".to_string(),
                "-bind".to_string(),
                bind_address.to_string(),
                "-bootstrap-expect".to_string(),
                quorum.to_string(),
            ])
    }

    /// Discovery server joining the quorum through `join_address`.
    #[must_use]
    pub fn discovery_joiner(&self, bind_address: &str, join_address: &str) -> ContainerSpec {
        self.base(&self.images.discovery)
            .with_network_mode(NetworkMode::Host)
            .with_command(["-server", "-bind", bind_address, "-join", join_address])
    }

    /// Scheduler agent advertising the host's engine at `advertise`.
    #[must_use]
    pub fn scheduler_agent(&self, advertise: &str, discovery_url: &str) -> ContainerSpec {
        self.base(&self.images.scheduler)
            .with_command(["join", "--advertise", advertise, discovery_url])
    }

    /// TLS-protected scheduler master on the management port.
    #[must_use]
    pub fn scheduler_master(&self, address: &str, discovery_url: &str) -> ContainerSpec {
        let port = self.management_port;
        self.base(&self.images.scheduler)
            .with_command([
                "manage".to_string(),
                "--tlsverify".to_string(),
                format!("--tlscacert={CERTS_MOUNT}/ca.pem"),
                format!("--tlscert={CERTS_MOUNT}/server.pem"),
                format!("--tlskey={CERTS_MOUNT}/server-key.pem"),
                "-H".to_string(),
                format!("tcp://0.0.0.0:{port}"),
                "--strategy".to_string(),
                "spread".to_string(),
                "--advertise".to_string(),
                format!("{address}:{port}"),
                discovery_url.to_string(),
            ])
            .with_bind(format!("{}:{CERTS_MOUNT}:ro", self.certificate_dir))
            .with_port_binding(port, port)
    }

    /// Registrar publishing local containers into the local discovery agent.
    #[must_use]
    pub fn registrar(&self) -> ContainerSpec {
        self.base(&self.images.registrar)
            .with_network_mode(NetworkMode::Host)
            .with_bind(format!("{ENGINE_SOCKET}:{REGISTRAR_SOCKET}"))
            .with_command([self.topology.local_backend_url()])
    }
}
