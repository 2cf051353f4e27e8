//! Simulation engine configuration.

use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest accepted `d` (draws per active asset).
    #[serde(default = "default_max_simulation_count")]
    pub max_simulation_count: usize,
    /// Requests with fewer active assets are simulated on the calling thread.
    #[serde(default = "default_min_parallel_assets")]
    pub min_parallel_assets: usize,
    /// Worker threads for the simulation pool (0 = rayon default).
    #[serde(default)]
    pub max_threads: usize,
    /// Fixed seed for reproducible runs (unset = fresh entropy per request).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_simulation_count: default_max_simulation_count(),
            min_parallel_assets: default_min_parallel_assets(),
            max_threads: 0,
            seed: None,
        }
    }
}

pub(crate) const fn default_max_simulation_count() -> usize {
    1_000_000
}

pub(crate) const fn default_min_parallel_assets() -> usize {
    4
}
