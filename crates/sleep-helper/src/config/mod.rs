mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod playback_config;
mod recording_config;
mod storage_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, playback_config::PlaybackConfig,
    recording_config::RecordingConfig, storage_config::StorageConfig,
};

pub(crate) const DEFAULT_MEDIA_KEY: bool = true;
pub(crate) const DEFAULT_PLAYER_PROGRAM: &str = "ffplay";
pub(crate) const DEFAULT_READY_TIMEOUT_MS: u64 = 15_000;
pub(crate) const DEFAULT_PROBE_WINDOW_MS: u64 = 300;
pub(crate) const DEFAULT_START_TIMEOUT_MS: u64 = 5_000;
pub(crate) const DEFAULT_FINALIZE_TIMEOUT_MS: u64 = 5_000;

pub(crate) fn default_media_key() -> bool {
    DEFAULT_MEDIA_KEY
}

pub(crate) fn default_player_program() -> String {
    DEFAULT_PLAYER_PROGRAM.to_string()
}

pub(crate) fn default_player_args() -> Vec<String> {
    ["-nodisp", "-autoexit", "-loglevel", "error"]
        .iter()
        .map(|arg| arg.to_string())
        .collect()
}

pub(crate) fn default_ready_timeout_ms() -> u64 {
    DEFAULT_READY_TIMEOUT_MS
}

pub(crate) fn default_probe_window_ms() -> u64 {
    DEFAULT_PROBE_WINDOW_MS
}

pub(crate) fn default_start_timeout_ms() -> u64 {
    DEFAULT_START_TIMEOUT_MS
}

pub(crate) fn default_finalize_timeout_ms() -> u64 {
    DEFAULT_FINALIZE_TIMEOUT_MS
}
