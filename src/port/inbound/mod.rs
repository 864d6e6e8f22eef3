//! Inbound (driving) ports consumed by inbound adapters.
//!
//! # Modules
//!
//! - [`operator`]: Operator-facing cluster and inspection use cases

pub mod operator;
