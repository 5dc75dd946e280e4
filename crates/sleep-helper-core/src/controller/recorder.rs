use crate::{
    CoreError,
    controller::Screen,
    recording::{RecordingSession, RecordingState},
};

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// What the recorder screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecorderState {
    /// A capture is running.
    pub is_recording: bool,
    /// When the running capture started.
    pub started_at: Option<Instant>,
    /// File of the running capture.
    pub output: Option<PathBuf>,
    /// File of the last finished capture.
    pub last_recording: Option<PathBuf>,
    /// Non-fatal problem with the last finished capture.
    pub warning: Option<String>,
    /// Message for the last failed intent.
    pub error: Option<String>,
}

/// Recorder screen controller. Owns its recording session; leaving the
/// screen always stops a running capture.
pub struct RecorderController {
    session: RecordingSession,
    state_tx: watch::Sender<RecorderState>,
}

impl RecorderController {
    /// Controller over an idle session.
    pub fn new(session: RecordingSession) -> Self {
        let (state_tx, _) = watch::channel(RecorderState::default());
        Self { session, state_tx }
    }

    /// Current snapshot.
    pub fn state(&self) -> RecorderState {
        self.state_tx.borrow().clone()
    }

    /// Receiver observing every update.
    pub fn subscribe(&self) -> watch::Receiver<RecorderState> {
        self.state_tx.subscribe()
    }

    /// Time since the running capture started.
    pub fn elapsed(&self) -> Option<Duration> {
        self.session.elapsed()
    }

    /// Start capturing a clip called `name`.
    #[instrument(skip(self))]
    pub async fn start_recording(&mut self, name: &str) {
        match self.session.start(name).await {
            Ok(output) => {
                let started_at = match self.session.state() {
                    RecordingState::Recording { started_at, .. } => Some(*started_at),
                    RecordingState::Idle => None,
                };
                self.state_tx.send_modify(|state| {
                    state.is_recording = true;
                    state.started_at = started_at;
                    state.output = Some(output);
                    state.warning = None;
                    state.error = None;
                });
            }
            Err(e @ CoreError::AlreadyRecording { .. }) => {
                warn!(error = %e, "Start ignored");
                self.state_tx
                    .send_modify(|state| state.error = Some(e.user_message()));
            }
            Err(e) => {
                warn!(error = %e, "Failed to start recording");
                self.state_tx.send_modify(|state| {
                    state.is_recording = false;
                    state.started_at = None;
                    state.output = None;
                    state.error = Some(e.user_message());
                });
            }
        }
    }

    /// Stop the running capture. Idle is a no-op.
    #[instrument(skip(self))]
    pub async fn stop_recording(&mut self) {
        let outcome = self.session.stop().await;

        self.state_tx.send_modify(|state| {
            state.is_recording = false;
            state.started_at = None;
            state.output = None;
            if let Some(outcome) = outcome {
                state.last_recording = Some(outcome.output);
                state.warning = outcome.warning.as_ref().map(CoreError::user_message);
                state.error = None;
            }
        });
    }
}

#[async_trait]
impl Screen for RecorderController {
    async fn on_enter(&mut self) {}

    async fn on_exit(&mut self) {
        if self.session.state().is_recording() {
            info!("Leaving recorder, stopping capture");
            self.stop_recording().await;
        }
    }
}
