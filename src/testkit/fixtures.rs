//! Canonical catalogs and orchestrators wired to the in-memory fakes.

use std::sync::Arc;
use std::time::Duration;

use super::directory::MemoryDirectory;
use super::engine::ScriptedEngine;
use crate::application::cluster::orchestrator::ClusterOrchestrator;
use crate::application::settings::LaunchSettings;
use crate::domain::container::ImageRef;
use crate::domain::discovery::DiscoveryTopology;
use crate::domain::host::HostId;
use crate::domain::service::{
    ServiceCatalog, ServiceImages, DEFAULT_CERTIFICATE_DIR, DEFAULT_MANAGEMENT_PORT,
};

fn image(reference: &str) -> ImageRef {
    match ImageRef::parse(reference) {
        Ok(image) => image,
        Err(e) => panic!("invalid test image {reference}: {e}"),
    }
}

/// Catalog with the stock images, ports and cluster name.
pub fn catalog() -> ServiceCatalog {
    ServiceCatalog {
        images: ServiceImages {
            discovery: image("progrium/consul"),
            scheduler: image("swarm"),
            registrar: image("gliderlabs/registrator"),
        },
        topology: DiscoveryTopology::default(),
        management_port: DEFAULT_MANAGEMENT_PORT,
        certificate_dir: DEFAULT_CERTIFICATE_DIR.to_string(),
    }
}

/// Default launch settings without the settle delay.
pub fn settings() -> LaunchSettings {
    LaunchSettings {
        settle_delay: Duration::ZERO,
        ..LaunchSettings::default()
    }
}

/// Host ids from names.
pub fn hosts(names: &[&str]) -> Vec<HostId> {
    names.iter().map(|n| HostId::new(*n)).collect()
}

/// Orchestrator over a [`MemoryDirectory`] holding `names` and a fresh
/// [`ScriptedEngine`].
pub fn orchestrator(
    names: &[&str],
) -> (ClusterOrchestrator, Arc<MemoryDirectory>, Arc<ScriptedEngine>) {
    orchestrator_with(names, settings())
}

/// Like [`orchestrator`] with explicit launch settings.
pub fn orchestrator_with(
    names: &[&str],
    settings: LaunchSettings,
) -> (ClusterOrchestrator, Arc<MemoryDirectory>, Arc<ScriptedEngine>) {
    let directory = Arc::new(MemoryDirectory::with_hosts(names));
    let engine = Arc::new(ScriptedEngine::new());
    let orchestrator =
        ClusterOrchestrator::new(catalog(), directory.clone(), engine.clone(), settings);
    (orchestrator, directory, engine)
}
