//! Operator implementations for inbound adapters.

pub mod cluster;
pub mod entry;
pub mod inspect;

mod shared;
