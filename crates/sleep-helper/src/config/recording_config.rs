use crate::config::{default_finalize_timeout_ms, default_start_timeout_ms};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sleep_helper_core::RecordingTimeouts;

/// Microphone capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Bound on waiting for the microphone to start.
    #[serde(default = "default_start_timeout_ms")]
    pub start_timeout_ms: u64,

    /// Bound on waiting for a recording file to be finalized.
    #[serde(default = "default_finalize_timeout_ms")]
    pub finalize_timeout_ms: u64,
}

impl RecordingConfig {
    /// Timeouts for a recording session.
    pub fn timeouts(&self) -> RecordingTimeouts {
        RecordingTimeouts {
            start: Duration::from_millis(self.start_timeout_ms),
            finalize: Duration::from_millis(self.finalize_timeout_ms),
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            start_timeout_ms: default_start_timeout_ms(),
            finalize_timeout_ms: default_finalize_timeout_ms(),
        }
    }
}
