//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Routine queue capacity used when a caller does not pick one.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Engine settings. Every field has a default, so a partial JSON document is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Queue capacity for doctors added without an explicit one
    pub default_queue_capacity: usize,
    /// Load the demo doctors, slots and patients at start-up
    pub seed_sample_data: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            seed_sample_data: true,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
