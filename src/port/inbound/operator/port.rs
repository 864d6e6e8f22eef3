//! Unified operator capability surface for inbound adapters.

use super::cluster::ClusterOperator;
use super::inspect::InspectOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort: ClusterOperator + InspectOperator {}

impl<T> OperatorPort for T where T: ClusterOperator + InspectOperator {}
