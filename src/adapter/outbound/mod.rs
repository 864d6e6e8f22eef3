//! Outbound adapters (driven side).

pub mod docker;
pub mod machine;
