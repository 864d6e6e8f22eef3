//! Domain validation errors for cluster types.
//!
//! These errors are returned by constructors that validate inputs, such as
//! parsing an engine URL or a cluster name.
//!
//! # Examples
//!
//! ```
//! use clusterator::domain::error::DomainError;
//! use clusterator::domain::host::{Endpoint, HostId};
//!
//! let result = Endpoint::parse(HostId::new("node-1"), "10.0.0.5", None);
//! assert!(matches!(result, Err(DomainError::InvalidEngineUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Engine URL is not of the form `scheme://host:port`.
    #[error("invalid engine url '{url}': {reason}")]
    InvalidEngineUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Cluster names scope a discovery key prefix and must be a single path segment.
    #[error("invalid cluster name '{name}': {reason}")]
    InvalidClusterName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Image references must name a repository.
    #[error("invalid image reference '{reference}'")]
    InvalidImage {
        /// The rejected reference.
        reference: String,
    },
}
