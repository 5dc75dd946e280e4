use crate::{
    CoreResult,
    catalog::{AudioCategory, AudioEntry, AudioSource, bundled_entries, naming},
};

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, warn};

/// Bundled entries plus the recordings found on disk.
///
/// Nothing is cached: every query that involves recordings re-reads the
/// recordings directory, so two calls may disagree if a capture finished in
/// between. Lookups by id are linear scans.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    bundled: Vec<AudioEntry>,
    recordings_dir: PathBuf,
    extension: String,
}

impl CatalogStore {
    /// Store over the app's bundled tracks.
    pub fn new<P: Into<PathBuf>>(recordings_dir: P, extension: &str) -> Self {
        Self::with_bundled(bundled_entries(), recordings_dir, extension)
    }

    /// Store over an explicit bundled list.
    pub fn with_bundled<P: Into<PathBuf>>(
        bundled: Vec<AudioEntry>,
        recordings_dir: P,
        extension: &str,
    ) -> Self {
        Self {
            bundled,
            recordings_dir: recordings_dir.into(),
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
        }
    }

    /// Directory scanned for recordings.
    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Entries of one category. `Recording` triggers a fresh directory scan.
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category: AudioCategory) -> CoreResult<Vec<AudioEntry>> {
        if category == AudioCategory::Recording {
            return self.scan_recordings().await;
        }

        Ok(self
            .bundled
            .iter()
            .filter(|entry| entry.category == category)
            .cloned()
            .collect())
    }

    /// Bundled entries followed by a fresh recordings scan.
    ///
    /// A recording whose id collides with a bundled id is dropped so ids stay
    /// unique across the combined list.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> CoreResult<Vec<AudioEntry>> {
        let mut all = self.bundled.clone();

        for recording in self.scan_recordings().await? {
            if all.iter().any(|entry| entry.id == recording.id) {
                warn!(id = %recording.id, "Recording id collides with bundled entry, skipped");
                continue;
            }
            all.push(recording);
        }

        Ok(all)
    }

    /// First entry with `id`, checking bundled entries before scanning disk.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> CoreResult<Option<AudioEntry>> {
        if let Some(entry) = self.bundled.iter().find(|entry| entry.id == id) {
            return Ok(Some(entry.clone()));
        }

        Ok(self
            .scan_recordings()
            .await?
            .into_iter()
            .find(|entry| entry.id == id))
    }

    /// Synthesize entries for every recording file, sorted by file name.
    async fn scan_recordings(&self) -> CoreResult<Vec<AudioEntry>> {
        let mut dir = match tokio::fs::read_dir(&self.recordings_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = ?self.recordings_dir, "Recordings directory missing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut recordings = Vec::new();
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if !item.file_type().await?.is_file() || !self.has_recording_extension(&path) {
                continue;
            }
            if let Some(entry) = Self::recording_entry(&path) {
                recordings.push(entry);
            }
        }

        recordings.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(count = recordings.len(), "Recordings scanned");

        Ok(recordings)
    }

    fn has_recording_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    fn recording_entry(path: &Path) -> Option<AudioEntry> {
        let file_name = path.file_name()?.to_str()?;
        let stem = path.file_stem()?.to_str()?;

        Some(AudioEntry {
            id: file_name.to_string(),
            title: naming::derive_title(stem),
            category: AudioCategory::Recording,
            source: AudioSource::Local(path.to_path_buf()),
            cover_id: None,
            duration_ms: 0,
        })
    }
}
