//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! cluster logic: configuration loading, logging setup and the operator
//! that wires adapters into the orchestrator for inbound adapters.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading, validation and logging
//! - [`operator`] - Operator implementation consumed by the CLI

pub mod config;
pub mod operator;
