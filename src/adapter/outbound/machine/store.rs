//! `HostDirectory` over docker-machine's on-disk store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::record::{apply_membership, MachineRecord};
use crate::domain::host::{Endpoint, HostId, SwarmMembership};
use crate::error::{Error, Result};
use crate::port::outbound::directory::HostDirectory;

const RECORD_FILE: &str = "config.json";

/// Machine store rooted at a docker-machine storage path.
#[derive(Debug, Clone)]
pub struct MachineStore {
    root: PathBuf,
    engine_port: u16,
    binary: String,
}

impl MachineStore {
    /// Store under `root`, resolving engines on `engine_port` and starting
    /// machines with `binary`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, engine_port: u16, binary: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            engine_port,
            binary: binary.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a host's record file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolution`] for names that are not a single path
    /// component.
    pub fn record_path(&self, host: &HostId) -> Result<PathBuf> {
        let name = host.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(Error::Resolution {
                host: host.clone(),
                reason: "not a valid machine name".to_string(),
            });
        }
        Ok(self.root.join("machines").join(name).join(RECORD_FILE))
    }

    async fn read_raw(&self, host: &HostId) -> Result<Value> {
        let path = self.record_path(host)?;
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::NotFound => format!("machine does not exist in {}", self.root.display()),
                _ => format!("cannot read {}: {e}", path.display()),
            };
            Error::Resolution {
                host: host.clone(),
                reason,
            }
        })?;
        serde_json::from_str(&content).map_err(|e| Error::Resolution {
            host: host.clone(),
            reason: format!("malformed {}: {e}", path.display()),
        })
    }
}

#[async_trait]
impl HostDirectory for MachineStore {
    async fn resolve(&self, host: &HostId) -> Result<Endpoint> {
        let raw = self.read_raw(host).await?;
        let record: MachineRecord = serde_json::from_value(raw).map_err(|e| Error::Resolution {
            host: host.clone(),
            reason: e.to_string(),
        })?;

        if record.driver.ip_address.is_empty() {
            return Err(Error::Resolution {
                host: host.clone(),
                reason: "machine has no IP address; is it running?".to_string(),
            });
        }

        let url = format!("tcp://{}:{}", record.driver.ip_address, self.engine_port);
        let tls = record.host_options.auth_options.tls();
        debug!(host = %host, url = %url, tls = tls.is_some(), "Resolved machine");

        Ok(Endpoint::parse(host.clone(), url, tls)?)
    }

    async fn persist_membership(&self, host: &HostId, membership: &SwarmMembership) -> Result<()> {
        let persist_error = |reason: String| Error::Persist {
            host: host.clone(),
            reason,
        };

        let mut raw = self.read_raw(host).await?;
        if !apply_membership(&mut raw, membership) {
            return Err(persist_error("record is not a JSON object".to_string()));
        }

        let path = self.record_path(host)?;
        let content = serde_json::to_vec_pretty(&raw).map_err(|e| persist_error(e.to_string()))?;
        replace_file(&path, &content).await.map_err(persist_error)?;

        info!(host = %host, discovery = %membership.discovery, "Saved swarm membership");
        Ok(())
    }

    async fn describe(&self, host: &HostId) -> Result<Value> {
        self.read_raw(host).await
    }

    async fn start_machine(&self, host: &HostId) -> Result<()> {
        self.record_path(host)?;
        info!(host = %host, "Starting machine");

        let output = Command::new(&self.binary)
            .arg("start")
            .arg(host.as_str())
            .output()
            .await
            .map_err(|e| Error::Machine {
                host: host.clone(),
                reason: format!("cannot run {}: {e}", self.binary),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Machine {
                host: host.clone(),
                reason: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Write `content` to a sibling staging file, then rename it over `path`.
/// The staging file is removed when the rename fails.
async fn replace_file(path: &Path, content: &[u8]) -> std::result::Result<(), String> {
    let staging = path.with_extension("json.tmp");
    tokio::fs::write(&staging, content)
        .await
        .map_err(|e| format!("cannot write {}: {e}", staging.display()))?;

    if let Err(e) = tokio::fs::rename(&staging, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
            warn!(path = %staging.display(), error = %cleanup, "Staging file left behind");
        }
        return Err(format!("cannot replace {}: {e}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn write_record(root: &Path, name: &str, record: &Value) {
        let dir = root.join("machines").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(RECORD_FILE), serde_json::to_vec(record).unwrap()).unwrap();
    }

    fn store(root: &TempDir) -> MachineStore {
        MachineStore::new(root.path(), 2376, "docker-machine")
    }

    #[tokio::test]
    async fn resolves_address_and_tls() {
        let root = TempDir::new().unwrap();
        write_record(
            root.path(),
            "node-1",
            &json!({
                "Driver": { "IPAddress": "192.168.99.100" },
                "HostOptions": { "AuthOptions": {
                    "CaCertPath": "/c/ca.pem",
                    "ClientCertPath": "/c/cert.pem",
                    "ClientKeyPath": "/c/key.pem"
                }}
            }),
        );

        let endpoint = store(&root).resolve(&HostId::new("node-1")).await.unwrap();

        assert_eq!(endpoint.url(), "tcp://192.168.99.100:2376");
        assert_eq!(endpoint.address(), "192.168.99.100");
        assert!(endpoint.tls().is_some());
    }

    #[tokio::test]
    async fn unknown_machine_is_a_resolution_error() {
        let root = TempDir::new().unwrap();
        let err = store(&root).resolve(&HostId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, Error::Resolution { .. }));
    }

    #[tokio::test]
    async fn stopped_machine_without_address_is_rejected() {
        let root = TempDir::new().unwrap();
        write_record(root.path(), "off", &json!({ "Driver": { "IPAddress": "" } }));

        let err = store(&root).resolve(&HostId::new("off")).await.unwrap_err();

        assert!(err.to_string().contains("no IP address"));
    }

    #[tokio::test]
    async fn path_like_names_are_rejected() {
        let root = TempDir::new().unwrap();
        let err = store(&root).resolve(&HostId::new("../etc")).await.unwrap_err();
        assert!(matches!(err, Error::Resolution { .. }));
    }

    #[tokio::test]
    async fn persisted_membership_keeps_other_fields() {
        let root = TempDir::new().unwrap();
        write_record(
            root.path(),
            "node-1",
            &json!({ "DriverName": "virtualbox", "Driver": { "IPAddress": "10.0.0.5" } }),
        );
        let store = store(&root);
        let host = HostId::new("node-1");

        store
            .persist_membership(&host, &SwarmMembership::master("consul://10.0.0.5:8500/barney"))
            .await
            .unwrap();

        let saved = store.describe(&host).await.unwrap();
        assert_eq!(saved["DriverName"], "virtualbox");
        assert_eq!(saved["HostOptions"]["SwarmOptions"]["IsSwarm"], true);
        assert_eq!(
            saved["HostOptions"]["SwarmOptions"]["Discovery"],
            "consul://10.0.0.5:8500/barney"
        );
        assert!(!root
            .path()
            .join("machines/node-1/config.json.tmp")
            .exists());
    }

    #[tokio::test]
    async fn failed_replace_removes_the_staging_file() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("config.json");
        std::fs::create_dir_all(target.join("occupied")).unwrap();

        let err = replace_file(&target, b"{}").await.unwrap_err();

        assert!(err.contains("cannot replace"));
        assert!(!root.path().join("config.json.tmp").exists());
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn replace_writes_the_new_content() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("config.json");
        std::fs::write(&target, b"old").unwrap();

        replace_file(&target, b"new").await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"new");
        assert!(!root.path().join("config.json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_binary_is_a_machine_error() {
        let root = TempDir::new().unwrap();
        let store = MachineStore::new(root.path(), 2376, "/nonexistent/docker-machine");

        let err = store.start_machine(&HostId::new("node-1")).await.unwrap_err();

        assert!(matches!(err, Error::Machine { .. }));
    }
}
