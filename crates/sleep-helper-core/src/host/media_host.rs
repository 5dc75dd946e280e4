//! Long-lived owner of the playback session.
//!
//! Screens and system media controls talk to the host through cloned
//! [`HostHandle`]s; only the host task touches the session, so commands are
//! applied strictly one after another.

use crate::{
    CoreError, CoreResult,
    catalog::{AudioEntry, CatalogStore},
    host::{HostHandle, MediaCommand},
    playback::PlaybackSession,
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, error, info, instrument};

/// Queue depth for pending host commands.
const COMMAND_CAPACITY: usize = 32;

/// How often a playing source is checked for having reached its end.
pub const FINISH_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Session boundary owning the shared player.
pub struct MediaHost {
    session: PlaybackSession,
    catalog: Arc<CatalogStore>,
    command_rx: mpsc::Receiver<MediaCommand>,
}

impl MediaHost {
    /// Start the host task on the current tokio runtime.
    ///
    /// The session is released exactly once: on [`HostHandle::shutdown`], or
    /// when the last handle is dropped.
    pub fn spawn(
        session: PlaybackSession,
        catalog: Arc<CatalogStore>,
    ) -> (HostHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let handle = HostHandle::new(command_tx, session.subscribe());

        let host = Self {
            session,
            catalog,
            command_rx,
        };
        let task = tokio::spawn(host.run());

        (handle, task)
    }

    #[instrument(skip(self))]
    async fn run(mut self) {
        info!("Media host started");

        let mut finish_poll = time::interval(FINISH_POLL_INTERVAL);
        finish_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let command = tokio::select! {
                command = self.command_rx.recv() => command,
                _ = finish_poll.tick() => {
                    self.session.sync_finished().await;
                    continue;
                }
            };
            let Some(command) = command else {
                break;
            };

            // Transport requests act on what is actually playing right now.
            self.session.sync_finished().await;

            match command {
                MediaCommand::Load { id, reply } => {
                    let _ = reply.send(self.load(&id).await);
                }
                MediaCommand::Play { reply } => {
                    let _ = reply.send(self.session.play().await);
                }
                MediaCommand::Pause { reply } => {
                    let _ = reply.send(self.session.pause().await);
                }
                MediaCommand::TogglePlayPause { reply } => {
                    let _ = reply.send(self.session.toggle_play_pause().await);
                }
                MediaCommand::Seek { position, reply } => {
                    let _ = reply.send(self.session.seek(position).await);
                }
                MediaCommand::Shutdown { reply } => {
                    info!("Shutdown requested");
                    let _ = reply.send(self.session.release().await);
                    break;
                }
            }
        }

        if !self.session.is_released() {
            debug!("All host handles dropped, releasing player");
            if let Err(e) = self.session.release().await {
                error!(error = ?e, "Failed to release player");
            }
        }

        info!("Media host stopped");
    }

    async fn load(&mut self, id: &str) -> CoreResult<AudioEntry> {
        let entry = self
            .catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                id: id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.session.load(entry.clone()).await?;

        Ok(entry)
    }
}
