//! CLI integration tests.

mod support {
    pub mod machines;
}

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use support::machines::MachineFixture;

fn clusterator() -> Command {
    let mut cmd = cargo_bin_cmd!("clusterator");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_every_command() {
    clusterator()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("consul"))
        .stdout(predicate::str::contains("registrator"))
        .stdout(predicate::str::contains("start-machines"));
}

#[test]
fn unknown_subcommand_fails() {
    clusterator()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("frobnicate"));
}

#[test]
fn create_requires_hosts() {
    clusterator().arg("create").assert().failure();
}

#[test]
fn ip_prints_host_and_address() {
    let fixture = MachineFixture::new();
    fixture.add("node-1", "192.168.99.100").add("node-2", "192.168.99.101");
    let config = fixture.config_file("");

    clusterator()
        .arg("--config")
        .arg(&config)
        .args(["ip", "node-2", "node-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node-2 192.168.99.101\nnode-1 192.168.99.100"));
}

#[test]
fn url_reports_unknown_hosts_without_failing_others() {
    let fixture = MachineFixture::new();
    fixture.add("node-1", "192.168.99.100");
    let config = fixture.config_file("");

    clusterator()
        .arg("--config")
        .arg(&config)
        .args(["url", "node-1", "ghost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node-1 tcp://192.168.99.100:2376"))
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn config_prints_docker_flags() {
    let fixture = MachineFixture::new();
    fixture.add("node-1", "192.168.99.100");
    let config = fixture.config_file("");

    clusterator()
        .arg("--config")
        .arg(&config)
        .args(["config", "node-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tlsverify"))
        .stdout(predicate::str::contains("ca.pem"))
        .stdout(predicate::str::contains("-H=tcp://192.168.99.100:2376"));
}

#[test]
fn json_prints_the_machine_record() {
    let fixture = MachineFixture::new();
    fixture.add("node-1", "192.168.99.100");
    let config = fixture.config_file("");

    let stdout = clusterator()
        .arg("--config")
        .arg(&config)
        .args(["json", "node-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"IPAddress\": \"192.168.99.100\""))
        .get_output()
        .stdout
        .clone();

    let printed: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(printed, fixture.read("node-1"));
}

#[test]
fn json_mode_wraps_lookups() {
    let fixture = MachineFixture::new();
    fixture.add("node-1", "192.168.99.100");
    let config = fixture.config_file("");

    let output = clusterator()
        .arg("--config")
        .arg(&config)
        .args(["--json", "ip", "node-1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["command"], "ip");
    assert_eq!(value["hosts"][0]["value"], "192.168.99.100");
}

#[test]
fn json_start_machines_prints_one_document() {
    let fixture = MachineFixture::new();
    fixture.add("node-1", "192.168.99.100");
    let config = fixture.config_file("binary = \"/nonexistent/docker-machine\"\n");

    let output = clusterator()
        .arg("--config")
        .arg(&config)
        .args(["--json", "start-machines", "node-1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["command"], "start-machines");
    assert_eq!(value["hosts"][0]["host"], "node-1");
    assert!(value["hosts"][0]["error"].is_string());
}

#[test]
fn missing_explicit_config_fails() {
    let fixture = MachineFixture::new();

    clusterator()
        .arg("--config")
        .arg(fixture.path().join("absent.toml"))
        .args(["ip", "node-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn malformed_config_fails_with_a_diagnostic() {
    let fixture = MachineFixture::new();
    let config = fixture.config_file("[ports]\nengine = \"nope\"\n");

    clusterator()
        .arg("--config")
        .arg(&config)
        .args(["--color", "never", "ip", "node-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn create_with_unknown_host_fails_before_touching_engines() {
    let fixture = MachineFixture::new();
    let config = fixture.config_file("[launch]\nsettle_delay_ms = 0\n");

    clusterator()
        .arg("--config")
        .arg(&config)
        .args(["--quiet", "create", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot resolve host ghost"));
}
