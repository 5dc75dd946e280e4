use crate::config::{
    default_player_args, default_player_program, default_probe_window_ms, default_ready_timeout_ms,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// External player configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Program launched to play a source (e.g. `ffplay`, `mpv`).
    #[serde(default = "default_player_program")]
    pub player_program: String,

    /// Arguments placed before the source locator.
    #[serde(default = "default_player_args")]
    pub player_args: Vec<String>,

    /// Bound on waiting for a source to become ready.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
    /// How long a launched player must keep running to count as ready.
    #[serde(default = "default_probe_window_ms")]
    pub probe_window_ms: u64,
}

impl PlaybackConfig {
    /// Ready timeout as a duration.
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    /// Probe window as a duration.
    pub fn probe_window(&self) -> Duration {
        Duration::from_millis(self.probe_window_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            player_program: default_player_program(),
            player_args: default_player_args(),
            ready_timeout_ms: default_ready_timeout_ms(),
            probe_window_ms: default_probe_window_ms(),
        }
    }
}
