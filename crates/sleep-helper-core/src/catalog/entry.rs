use std::{fmt, path::PathBuf};

/// Closed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCategory {
    /// Bundled ambient tracks.
    WhiteNoise,
    /// Bundled bedtime stories.
    Story,
    /// Clips recorded on this device.
    Recording,
}

impl AudioCategory {
    /// All categories in display order.
    pub const ALL: [AudioCategory; 3] = [
        AudioCategory::WhiteNoise,
        AudioCategory::Story,
        AudioCategory::Recording,
    ];

    /// Label shown above the category's list.
    pub fn display_name(self) -> &'static str {
        match self {
            AudioCategory::WhiteNoise => "白噪音",
            AudioCategory::Story => "睡前故事",
            AudioCategory::Recording => "我的录音",
        }
    }
}

/// Where a player finds the audio for an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// HTTP(S) address of a bundled track.
    Remote(String),
    /// Absolute path of an on-device recording.
    Local(PathBuf),
}

impl AudioSource {
    /// Locator string handed to players and logs.
    pub fn locator(&self) -> String {
        match self {
            AudioSource::Remote(url) => url.clone(),
            AudioSource::Local(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.locator())
    }
}

/// One playable catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioEntry {
    /// Unique within the combined catalog. Recordings use their file name.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Category the entry is listed under.
    pub category: AudioCategory,
    /// Locator the player binds to.
    pub source: AudioSource,
    /// Optional cover art key; stored but unused.
    pub cover_id: Option<u32>,
    /// Duration in milliseconds, 0 when unknown; stored but unused.
    pub duration_ms: u64,
}

impl AudioEntry {
    /// Bundled entry with a remote locator and no metadata.
    pub fn bundled(id: &str, title: &str, category: AudioCategory, url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            category,
            source: AudioSource::Remote(url.to_string()),
            cover_id: None,
            duration_ms: 0,
        }
    }
}
