use crate::{
    CoreError, CoreResult,
    catalog::naming,
    recording::{ActiveCapture, CaptureBackend, CaptureSummary, RecordingState},
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Local;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Default bound on waiting for the microphone to start.
pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on waiting for the output file to be finalized.
pub const DEFAULT_FINALIZE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bounded waits applied to the capture backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingTimeouts {
    /// Limit on [`CaptureBackend::begin`].
    pub start: Duration,
    /// Limit on [`ActiveCapture::finish`].
    pub finalize: Duration,
}

impl Default for RecordingTimeouts {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_TIMEOUT,
            finalize: DEFAULT_FINALIZE_TIMEOUT,
        }
    }
}

/// Result of stopping a capture.
#[derive(Debug)]
pub struct RecordingOutcome {
    /// File the capture wrote to. Kept even when finalization failed.
    pub output: PathBuf,
    /// Wall-clock length of the capture.
    pub duration: Duration,
    /// Backend summary when finalization succeeded.
    pub summary: Option<CaptureSummary>,
    /// `IncompleteRecording` when finalization failed.
    pub warning: Option<CoreError>,
}

/// Owns at most one microphone capture at a time.
///
/// `start` and `stop` always pair up: a failed `start` leaves nothing
/// allocated and `stop` returns the session to idle whatever the backend
/// reports.
pub struct RecordingSession {
    backend: Arc<dyn CaptureBackend>,
    recordings_dir: PathBuf,
    timeouts: RecordingTimeouts,
    state: RecordingState,
    active: Option<Box<dyn ActiveCapture>>,
}

impl RecordingSession {
    /// Create an idle session writing into `recordings_dir`.
    pub fn new<P: Into<PathBuf>>(
        backend: Arc<dyn CaptureBackend>,
        recordings_dir: P,
        timeouts: RecordingTimeouts,
    ) -> Self {
        Self {
            backend,
            recordings_dir: recordings_dir.into(),
            timeouts,
            state: RecordingState::Idle,
            active: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &RecordingState {
        &self.state
    }

    /// Directory new recordings are written to.
    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Time since the running capture started.
    pub fn elapsed(&self) -> Option<Duration> {
        match &self.state {
            RecordingState::Recording { started_at, .. } => Some(started_at.elapsed()),
            RecordingState::Idle => None,
        }
    }

    /// Start capturing into `REC_<name>_<timestamp>.<ext>`.
    ///
    /// # Errors
    ///
    /// `AlreadyRecording` if a capture is running (that capture is left
    /// untouched), `CaptureUnavailable` if the backend refuses, `Timeout` if
    /// the backend does not confirm in time.
    #[instrument(skip(self))]
    pub async fn start(&mut self, name: &str) -> CoreResult<PathBuf> {
        if let RecordingState::Recording { output, .. } = &self.state {
            return Err(CoreError::AlreadyRecording {
                output: output.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        tokio::fs::create_dir_all(&self.recordings_dir).await?;

        let output = naming::unused_recording_path(
            &self.recordings_dir,
            name,
            Local::now().naive_local(),
            self.backend.file_extension(),
        )
        .await?;

        let begun = match tokio::time::timeout(self.timeouts.start, self.backend.begin(&output))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout {
                operation: "Microphone start",
                after: self.timeouts.start,
                location: ErrorLocation::from(Location::caller()),
            }),
        };
        let active = match begun {
            Ok(active) => active,
            Err(e) => {
                discard_partial(&output).await;
                return Err(e);
            }
        };

        let session_id = Uuid::new_v4();
        self.active = Some(active);
        self.state = RecordingState::Recording {
            output: output.clone(),
            started_at: Instant::now(),
            session_id,
        };

        info!(session_id = %session_id, output = ?output, "Recording started");

        Ok(output)
    }

    /// Stop the running capture. Returns `None` when idle.
    ///
    /// Finalization problems come back as a warning on the outcome; the
    /// session is idle afterwards in every case.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Option<RecordingOutcome> {
        let state = std::mem::replace(&mut self.state, RecordingState::Idle);
        let RecordingState::Recording {
            output,
            started_at,
            session_id,
        } = state
        else {
            debug!("Stop requested while idle");
            return None;
        };

        let duration = started_at.elapsed();
        let Some(active) = self.active.take() else {
            warn!(session_id = %session_id, "Recording state without a capture handle");
            return Some(RecordingOutcome {
                output,
                duration,
                summary: None,
                warning: None,
            });
        };

        let (summary, warning) =
            match tokio::time::timeout(self.timeouts.finalize, active.finish()).await {
                Ok(Ok(summary)) => (Some(summary), None),
                Ok(Err(e @ CoreError::IncompleteRecording { .. })) => (None, Some(e)),
                Ok(Err(e)) => (
                    None,
                    Some(CoreError::IncompleteRecording {
                        output: output.clone(),
                        reason: e.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    }),
                ),
                Err(_) => (
                    None,
                    Some(CoreError::IncompleteRecording {
                        output: output.clone(),
                        reason: format!("finalize timed out after {:?}", self.timeouts.finalize),
                        location: ErrorLocation::from(Location::caller()),
                    }),
                ),
            };

        match &warning {
            Some(e) => warn!(session_id = %session_id, error = %e, "Recording stopped incomplete"),
            None => info!(
                session_id = %session_id,
                duration_ms = duration.as_millis(),
                "Recording stopped"
            ),
        }

        Some(RecordingOutcome {
            output,
            duration,
            summary,
            warning,
        })
    }
}

/// Remove whatever a failed start left at `output`.
async fn discard_partial(output: &Path) {
    match tokio::fs::remove_file(output).await {
        Ok(()) => debug!(output = ?output, "Removed file left by failed start"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(error = %e, output = ?output, "Failed to remove file left by failed start"),
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        if let RecordingState::Recording { session_id, .. } = &self.state {
            // The capture handle stops itself on drop; the file may lack a valid trailer.
            warn!(session_id = %session_id, "Recording session dropped while recording");
        }
    }
}
