use std::{path::PathBuf, time::Instant};

use uuid::Uuid;

/// Recording state of a [`RecordingSession`](crate::RecordingSession).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingState {
    /// Not currently recording.
    Idle,
    /// Currently recording audio.
    Recording {
        /// File the capture writes to.
        output: PathBuf,
        /// When recording started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

impl RecordingState {
    /// True while a capture is running.
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording { .. })
    }
}
