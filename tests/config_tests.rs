use std::fs;

use clusterator::application::settings::{FanOut, ServiceFailurePolicy};
use clusterator::error::{ConfigError, Error};
use clusterator::infrastructure::config::settings::Config;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn full_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[cluster]
name = "wilma"
discovery_scheme = "consul"

[images]
discovery = "progrium/consul:0.5"
scheduler = "swarm:1.0.0"
registrar = "registry:5000/gliderlabs/registrator"

[ports]
discovery = 8500
discovery_cluster = 8301
engine = 2376
management = 3376

[launch]
settle_delay_ms = 250
fan_out = "parallel"
service_failure = "continue"
certificate_dir = "/etc/docker"

[machine]
storage_path = "/srv/machine"
binary = "/usr/local/bin/docker-machine"

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(&path).unwrap();
    let catalog = config.catalog().unwrap();

    assert_eq!(catalog.topology.backend_url("10.0.0.5"), "consul://10.0.0.5:8500/wilma");
    assert_eq!(catalog.images.scheduler.tag(), "1.0.0");
    assert_eq!(
        catalog.images.registrar.repository(),
        "registry:5000/gliderlabs/registrator"
    );
    assert_eq!(catalog.images.registrar.tag(), "latest");
    assert_eq!(catalog.certificate_dir, "/etc/docker");

    let launch = config.launch_settings();
    assert_eq!(launch.settle_delay.as_millis(), 250);
    assert_eq!(launch.fan_out, FanOut::Parallel);
    assert_eq!(launch.service_failure, ServiceFailurePolicy::Continue);

    assert_eq!(config.machine.storage_path(), std::path::PathBuf::from("/srv/machine"));
    assert_eq!(config.logging.format, "json");
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn unknown_fan_out_mode_is_a_parse_error() {
    let result = Config::parse_toml("[launch]\nfan_out = \"sideways\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn zero_port_is_rejected() {
    let result = Config::parse_toml("[ports]\nengine = 0\n");
    match result {
        Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
            assert_eq!(field, "ports.engine");
        }
        other => panic!("expected invalid port, got {other:?}"),
    }
}

#[test]
fn empty_machine_binary_is_rejected() {
    let result = Config::parse_toml("[machine]\nbinary = \"\"\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingField { field: "machine.binary" }))
    ));
}
