//! Cluster lifecycle use cases.
//!
//! - [`bootstrap`]: discovery quorum formation
//! - [`service`]: scheduler and registrar launch on quorum members
//! - [`teardown`]: forced removal of every service container
//! - [`orchestrator`]: facade wiring the three together

pub mod bootstrap;
pub mod orchestrator;
pub mod service;
pub mod teardown;
