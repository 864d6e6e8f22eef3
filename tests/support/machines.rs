use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// A docker-machine store in a temporary directory.
pub struct MachineFixture {
    pub root: TempDir,
}

impl MachineFixture {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create temp store"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Add a running machine with TLS material at `ip`.
    pub fn add(&self, name: &str, ip: &str) -> &Self {
        let certs = self.path().join("certs");
        self.write(
            name,
            &json!({
                "ConfigVersion": 3,
                "DriverName": "virtualbox",
                "Name": name,
                "Driver": { "IPAddress": ip, "MachineName": name },
                "HostOptions": {
                    "AuthOptions": {
                        "CaCertPath": certs.join("ca.pem"),
                        "ClientCertPath": certs.join("cert.pem"),
                        "ClientKeyPath": certs.join("key.pem"),
                    },
                    "SwarmOptions": { "IsSwarm": false, "Master": false, "Discovery": "" }
                }
            }),
        );
        self
    }

    /// Write `record` as the machine's `config.json`.
    pub fn write(&self, name: &str, record: &Value) {
        let path = self.record_path(name);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).expect("create machine dir");
        }
        fs::write(
            &path,
            serde_json::to_vec_pretty(record).expect("encode record"),
        )
        .expect("write record");
    }

    pub fn read(&self, name: &str) -> Value {
        let content = fs::read_to_string(self.record_path(name)).expect("read record");
        serde_json::from_str(&content).expect("decode record")
    }

    pub fn record_path(&self, name: &str) -> PathBuf {
        self.path().join("machines").join(name).join("config.json")
    }

    /// Write a config file pointing at this store; returns its path.
    pub fn config_file(&self, extra: &str) -> PathBuf {
        let path = self.path().join("clusterator.toml");
        let content = format!(
            "[machine]\nstorage_path = {:?}\n\n{extra}",
            self.path().display().to_string()
        );
        fs::write(&path, content).expect("write config");
        path
    }
}
