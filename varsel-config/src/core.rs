//! Core system configuration parameters.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Core system configuration parameters.
#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CoreConfig {
    /// Event bus configuration for producer-to-engine communication.
    #[validate(nested)]
    #[serde(default)]
    pub event_bus: EventBusConfig,
}

/// Event bus sizing.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct EventBusConfig {
    /// Capacity of the event queue; producers see backpressure beyond this.
    #[serde(default = "default_capacity")]
    #[validate(range(min = 128, max = 1_048_576))]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    4096
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}
