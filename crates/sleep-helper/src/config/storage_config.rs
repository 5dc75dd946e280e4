use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where recordings are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Recordings directory (None = `<data dir>/recordings`, relative paths
    /// are taken under `<data dir>`).
    #[serde(default)]
    pub recordings_dir: Option<PathBuf>,
}
