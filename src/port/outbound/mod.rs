//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the two external collaborators of the
//! orchestrator: the host directory and the container engine.

pub mod directory;
pub mod engine;
