//! High-level runtime engine settings
//!
//! Selects how a `Scenario` is stepped (sequential or threaded) and whether
//! the system is recentered on its barycenter before the first step

use serde::Deserialize;

/// How the force pass is executed
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[serde(rename = "sequential")] // single thread, pair loop with shared reaction term
    #[default]
    Sequential,

    #[serde(rename = "threaded")] // one worker thread per body, see `ParallelStepScheduler`
    Threaded,
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub mode: ExecutionMode, // sequential or threaded
    pub barycentric: bool, // recenter on the barycenter before stepping
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            barycentric: true,
        }
    }
}
