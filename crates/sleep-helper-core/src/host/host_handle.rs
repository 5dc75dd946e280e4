use crate::{
    CoreError, CoreResult,
    catalog::AudioEntry,
    host::{MediaCommand, Reply},
    playback::{PlaybackState, TransportOutcome},
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, oneshot, watch};

/// Cloneable address of a running [`MediaHost`](crate::MediaHost).
///
/// Works independently of any screen; the global media key uses the same
/// handle as the player screen.
#[derive(Clone)]
pub struct HostHandle {
    command_tx: mpsc::Sender<MediaCommand>,
    state_rx: watch::Receiver<PlaybackState>,
}

impl HostHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<MediaCommand>,
        state_rx: watch::Receiver<PlaybackState>,
    ) -> Self {
        Self {
            command_tx,
            state_rx,
        }
    }

    /// Latest published playback state.
    pub fn state(&self) -> PlaybackState {
        self.state_rx.borrow().clone()
    }

    /// Receiver observing every playback state change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_rx.clone()
    }

    /// Play the catalog entry with `id`, replacing the current item.
    pub async fn load(&self, id: &str) -> CoreResult<AudioEntry> {
        let id = id.to_string();
        self.request(|reply| MediaCommand::Load { id, reply }).await
    }

    /// Resume output.
    pub async fn play(&self) -> CoreResult<TransportOutcome> {
        self.request(|reply| MediaCommand::Play { reply }).await
    }

    /// Pause output.
    pub async fn pause(&self) -> CoreResult<TransportOutcome> {
        self.request(|reply| MediaCommand::Pause { reply }).await
    }

    /// Pause when playing, resume when paused.
    pub async fn toggle_play_pause(&self) -> CoreResult<TransportOutcome> {
        self.request(|reply| MediaCommand::TogglePlayPause { reply })
            .await
    }

    /// Seek within the loaded entry.
    pub async fn seek(&self, position: Duration) -> CoreResult<TransportOutcome> {
        self.request(|reply| MediaCommand::Seek { position, reply })
            .await
    }

    /// Release the player and stop the host. Later requests fail with
    /// `HostUnavailable`.
    pub async fn shutdown(&self) -> CoreResult<()> {
        self.request(|reply| MediaCommand::Shutdown { reply }).await
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> MediaCommand) -> CoreResult<T> {
        let (reply, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply))
            .await
            .map_err(|e| CoreError::HostUnavailable {
                reason: format!("Failed to send command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        reply_rx.await.map_err(|e| CoreError::HostUnavailable {
            reason: format!("Host dropped the request: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?
    }
}
