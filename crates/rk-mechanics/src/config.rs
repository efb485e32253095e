//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};
use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Configuration for a roll engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// RNG seed for reproducible rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// How many rolls the history keeps.
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the history capacity (at least 1).
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> MechResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MechError::InvalidConfig(e.to_string()))?;
        let capacity = config.history_capacity;
        Ok(config.with_history_capacity(capacity))
    }
}
