//! Application services (use cases).
//!
//! These services sequence domain logic over the outbound ports to bring
//! clusters up and tear them down.

pub mod cluster;
pub mod connection;
pub mod fleet;
pub mod settings;
