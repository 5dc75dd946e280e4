use std::{path::PathBuf, time::Duration};

use error_location::ErrorLocation;
use thiserror::Error;

/// Catalog, capture and playback errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The platform refused to hand out a capture resource (no microphone,
    /// device busy, permission missing).
    #[error("Capture unavailable: {reason} {location}")]
    CaptureUnavailable {
        /// Description of the refusal.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// `start` was called while a capture is already running.
    #[error("Already recording to {output:?} {location}")]
    AlreadyRecording {
        /// Output file of the capture that is still running.
        output: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture was stopped but the output could not be finalized.
    ///
    /// Non-fatal: the recording session is idle again when this is reported.
    #[error("Incomplete recording {output:?}: {reason} {location}")]
    IncompleteRecording {
        /// Output file, possibly partial or empty.
        output: PathBuf,
        /// Why finalization failed.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The player could not bind to a source (unreachable or unsupported).
    #[error("Playback source error for {locator}: {reason} {location}")]
    PlaybackSourceError {
        /// Locator of the source that failed.
        locator: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A bounded wait on a platform resource expired.
    #[error("{operation} timed out after {after:?} {location}")]
    Timeout {
        /// Operation that was waited on.
        operation: &'static str,
        /// Configured bound.
        after: Duration,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No catalog entry has the requested id.
    #[error("No audio entry with id {id:?} {location}")]
    NotFound {
        /// Requested id.
        id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The playback session has already been released.
    #[error("Playback session already released {location}")]
    SessionReleased {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The media host is no longer accepting commands.
    #[error("Media host unavailable: {reason} {location}")]
    HostUnavailable {
        /// Description of the channel failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Filesystem error.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::CaptureUnavailable { reason, .. } => {
                format!("Microphone unavailable: {reason}")
            }
            CoreError::AlreadyRecording { .. } => "A recording is already running".to_string(),
            CoreError::IncompleteRecording { reason, .. } => {
                format!("Recording may be incomplete: {reason}")
            }
            CoreError::PlaybackSourceError { reason, .. } => {
                format!("Cannot play this audio: {reason}")
            }
            CoreError::Timeout { operation, .. } => format!("{operation} took too long"),
            CoreError::NotFound { id, .. } => format!("Audio {id} not found"),
            CoreError::SessionReleased { .. } | CoreError::HostUnavailable { .. } => {
                "Player is shutting down".to_string()
            }
            CoreError::Io { source, .. } => format!("Storage error: {source}"),
        }
    }
}

// Manual From<io::Error> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<std::io::Error> for CoreError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        CoreError::Io {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
