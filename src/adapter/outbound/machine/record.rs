//! Typed view of a docker-machine host record.
//!
//! Only the fields the orchestrator reads are modeled. Writes go through
//! [`apply_membership`] on the raw JSON so fields this crate does not know
//! about survive a save.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::host::{SwarmMembership, TlsMaterial};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MachineRecord {
    pub name: String,
    pub driver: DriverInfo,
    pub host_options: HostOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverInfo {
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HostOptions {
    pub auth_options: AuthOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AuthOptions {
    pub ca_cert_path: String,
    pub client_cert_path: String,
    pub client_key_path: String,
}

impl AuthOptions {
    /// Client TLS material, when all three paths are set.
    #[must_use]
    pub fn tls(&self) -> Option<TlsMaterial> {
        let paths = [&self.ca_cert_path, &self.client_cert_path, &self.client_key_path];
        if paths.iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(TlsMaterial {
            ca_cert: self.ca_cert_path.clone().into(),
            client_cert: self.client_cert_path.clone().into(),
            client_key: self.client_key_path.clone().into(),
        })
    }
}

/// Write membership into `HostOptions.SwarmOptions`, creating the objects
/// when missing and leaving every other field as it was.
///
/// Returns `false` when the record or `HostOptions` is not a JSON object.
pub fn apply_membership(record: &mut Value, membership: &SwarmMembership) -> bool {
    let Some(root) = record.as_object_mut() else {
        return false;
    };
    let Some(host_options) = object_entry(root, "HostOptions") else {
        return false;
    };
    let Some(swarm) = object_entry(host_options, "SwarmOptions") else {
        return false;
    };

    swarm.insert("IsSwarm".to_string(), Value::Bool(membership.is_swarm));
    swarm.insert("Master".to_string(), Value::Bool(membership.master));
    swarm.insert(
        "Discovery".to_string(),
        Value::String(membership.discovery.clone()),
    );
    true
}

fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Map<String, Value>> {
    map.entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_address_and_certificates() {
        let record: MachineRecord = serde_json::from_value(json!({
            "Name": "node-1",
            "Driver": { "IPAddress": "192.168.99.100", "MachineName": "node-1" },
            "HostOptions": {
                "AuthOptions": {
                    "CaCertPath": "/m/ca.pem",
                    "ClientCertPath": "/m/cert.pem",
                    "ClientKeyPath": "/m/key.pem"
                }
            }
        }))
        .unwrap();

        assert_eq!(record.driver.ip_address, "192.168.99.100");
        let tls = record.host_options.auth_options.tls().unwrap();
        assert_eq!(tls.client_key.to_str(), Some("/m/key.pem"));
    }

    #[test]
    fn partial_auth_options_mean_no_tls() {
        let auth = AuthOptions {
            ca_cert_path: "/m/ca.pem".into(),
            ..AuthOptions::default()
        };
        assert!(auth.tls().is_none());
    }

    #[test]
    fn membership_preserves_unknown_fields() {
        let mut record = json!({
            "ConfigVersion": 3,
            "HostOptions": {
                "EngineOptions": { "StorageDriver": "aufs" },
                "SwarmOptions": { "IsSwarm": false, "Image": "swarm:latest" }
            }
        });

        assert!(apply_membership(
            &mut record,
            &SwarmMembership::master("consul://10.0.0.5:8500/barney")
        ));

        assert_eq!(record["ConfigVersion"], 3);
        assert_eq!(record["HostOptions"]["EngineOptions"]["StorageDriver"], "aufs");
        let swarm = &record["HostOptions"]["SwarmOptions"];
        assert_eq!(swarm["IsSwarm"], true);
        assert_eq!(swarm["Master"], true);
        assert_eq!(swarm["Discovery"], "consul://10.0.0.5:8500/barney");
        assert_eq!(swarm["Image"], "swarm:latest");
    }

    #[test]
    fn membership_creates_missing_sections() {
        let mut record = json!({ "Name": "node-1" });
        assert!(apply_membership(&mut record, &SwarmMembership::master("x")));
        assert_eq!(record["HostOptions"]["SwarmOptions"]["Discovery"], "x");
    }

    #[test]
    fn non_object_record_is_refused() {
        let mut record = json!([1, 2]);
        assert!(!apply_membership(&mut record, &SwarmMembership::master("x")));
    }
}
