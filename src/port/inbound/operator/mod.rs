//! Operator-facing inbound ports consumed by CLI adapters.

pub mod cluster;
pub mod inspect;
pub mod port;
