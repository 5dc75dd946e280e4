use crate::config::default_media_key;

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether the global play/pause media key controls playback.
    #[serde(default = "default_media_key")]
    pub media_key: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            media_key: default_media_key(),
        }
    }
}
