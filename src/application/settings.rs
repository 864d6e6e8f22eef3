//! Launch behavior knobs shared by the orchestration use cases.

use std::time::Duration;

use serde::Deserialize;

/// Default wait after each container start.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// How independent per-host operations are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanOut {
    /// One host at a time, in operator order.
    #[default]
    Sequential,
    /// All hosts concurrently; results are gathered once every host is done.
    Parallel,
}

/// What a dependent-service failure on one host does to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceFailurePolicy {
    /// Stop at the first failing host and report its error.
    #[default]
    Abort,
    /// Attempt every host and report all failures together.
    Continue,
}

/// Launch behavior for one orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchSettings {
    pub settle_delay: Duration,
    pub fan_out: FanOut,
    pub service_failure: ServiceFailurePolicy,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            fan_out: FanOut::default(),
            service_failure: ServiceFailurePolicy::default(),
        }
    }
}
