mod backend;
mod microphone;
mod session;
mod state;

pub use {
    backend::{ActiveCapture, CaptureBackend, CaptureSummary},
    microphone::MicrophoneBackend,
    session::{
        DEFAULT_FINALIZE_TIMEOUT, DEFAULT_START_TIMEOUT, RecordingOutcome, RecordingSession,
        RecordingTimeouts,
    },
    state::RecordingState,
};
