//! Architecture contract tests.

mod support {
    pub mod architecture;
}

use support::architecture::{
    find_crate_uses_outside, find_lines_containing, find_non_export_lines_in_mod_files,
    read_relative,
};

#[test]
fn cli_has_no_direct_infrastructure_imports() {
    let hits = find_lines_containing(
        "src/adapter/inbound/cli",
        &["use crate::infrastructure", "crate::infrastructure::"],
    );

    assert!(
        hits.is_empty(),
        "found direct infrastructure imports in inbound CLI adapters: {hits:#?}"
    );
}

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "bollard::",
            "async_trait",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn cli_operator_bridge_uses_operator_name() {
    let source = read_relative("src/adapter/inbound/cli/operator.rs");
    assert!(
        source.contains("pub fn operator() -> &'static dyn OperatorPort"),
        "operator bridge should expose `operator()` capability accessor"
    );
}

#[test]
fn operator_ports_are_transport_agnostic() {
    let hits = find_lines_containing("src/port/inbound/operator", &["std::path::Path", "PathBuf"]);
    assert!(
        hits.is_empty(),
        "operator inbound ports should not expose filesystem path types: {hits:#?}"
    );
}

#[test]
fn application_layer_has_no_direct_adapter_imports() {
    let hits = find_lines_containing("src/application", &["crate::adapter::", "bollard::"]);
    assert!(
        hits.is_empty(),
        "application layer should not import adapters directly: {hits:#?}"
    );
}

#[test]
fn ports_do_not_depend_on_adapters_or_application() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter::", "crate::application::", "crate::infrastructure::"],
    );
    assert!(
        hits.is_empty(),
        "ports should depend only on domain and error types: {hits:#?}"
    );
}

#[test]
fn engine_sdk_is_confined_to_its_adapter() {
    let hits = find_crate_uses_outside("src", "bollard", "src/adapter/outbound/docker/");
    assert!(
        hits.is_empty(),
        "bollard should only be used by the docker adapter: {hits:#?}"
    );
}

#[test]
fn engine_sdk_scan_sees_the_docker_adapter() {
    let hits = find_lines_containing("src/adapter/outbound/docker", &["use bollard"]);
    assert!(!hits.is_empty(), "expected bollard imports in the docker adapter");
}
