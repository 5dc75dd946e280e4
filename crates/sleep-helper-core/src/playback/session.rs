use crate::{
    CoreError, CoreResult,
    catalog::AudioEntry,
    playback::{MediaPlayer, PlaybackPhase, PlaybackState, TransportOutcome},
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Default bound on waiting for a source to become ready.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(15);

/// Drives the one shared [`MediaPlayer`] and publishes its state.
///
/// Loading a new entry replaces the previous one. A failed load leaves the
/// session `Empty`, never stuck in `Loading`. A failed pause or resume keeps
/// the entry bound and the phase unchanged.
pub struct PlaybackSession {
    player: Box<dyn MediaPlayer>,
    ready_timeout: Duration,
    state_tx: watch::Sender<PlaybackState>,
    released: bool,
}

impl PlaybackSession {
    /// Wrap `player`. The session starts `Empty`.
    pub fn new(player: Box<dyn MediaPlayer>, ready_timeout: Duration) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::default());
        Self {
            player,
            ready_timeout,
            state_tx,
            released: false,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> PlaybackState {
        self.state_tx.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// True once [`release`](Self::release) has run.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Bind the player to `entry` and start playing it.
    ///
    /// # Errors
    ///
    /// `PlaybackSourceError` from the player, or `Timeout` if readiness is not
    /// confirmed within the ready timeout. Either way the session is `Empty`
    /// afterwards.
    #[instrument(skip(self, entry), fields(id = %entry.id))]
    pub async fn load(&mut self, entry: AudioEntry) -> CoreResult<()> {
        self.ensure_live()?;

        if self.state_tx.borrow().current.is_some() {
            if let Err(e) = self.player.stop().await {
                warn!(error = %e, "Failed to stop previous item");
            }
        }

        let source = entry.source.clone();
        self.publish(Some(entry), PlaybackPhase::Loading);

        let prepared = match tokio::time::timeout(self.ready_timeout, self.player.prepare(&source))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout {
                operation: "Playback load",
                after: self.ready_timeout,
                location: ErrorLocation::from(Location::caller()),
            }),
        };

        let started = match prepared {
            Ok(()) => self.player.play().await,
            Err(e) => Err(e),
        };

        if let Err(e) = started {
            return Err(self.fail(e).await);
        }

        self.state_tx.send_modify(|state| state.phase = PlaybackPhase::Playing);
        info!(source = %source, "Playback started");

        Ok(())
    }

    /// Pause when playing, resume when paused.
    #[instrument(skip(self))]
    pub async fn toggle_play_pause(&mut self) -> CoreResult<TransportOutcome> {
        self.ensure_live()?;
        self.sync_finished().await;

        match self.phase() {
            PlaybackPhase::Playing => self.pause().await,
            PlaybackPhase::Paused => self.play().await,
            PlaybackPhase::Empty | PlaybackPhase::Loading => Ok(self.nothing_loaded("toggle")),
        }
    }

    /// Resume output. Already playing is a no-op.
    #[instrument(skip(self))]
    pub async fn play(&mut self) -> CoreResult<TransportOutcome> {
        self.ensure_live()?;

        match self.phase() {
            PlaybackPhase::Playing => Ok(TransportOutcome::Playing),
            PlaybackPhase::Paused => {
                if let Err(e) = self.player.play().await {
                    warn!(error = %e, "Failed to resume, staying paused");
                    return Err(e);
                }
                self.state_tx.send_modify(|state| state.phase = PlaybackPhase::Playing);
                debug!("Playback resumed");
                Ok(TransportOutcome::Playing)
            }
            PlaybackPhase::Empty | PlaybackPhase::Loading => Ok(self.nothing_loaded("play")),
        }
    }

    /// Pause output. Already paused is a no-op.
    #[instrument(skip(self))]
    pub async fn pause(&mut self) -> CoreResult<TransportOutcome> {
        self.ensure_live()?;

        match self.phase() {
            PlaybackPhase::Paused => Ok(TransportOutcome::Paused),
            PlaybackPhase::Playing => {
                if let Err(e) = self.player.pause().await {
                    warn!(error = %e, "Failed to pause, still playing");
                    return Err(e);
                }
                self.state_tx.send_modify(|state| state.phase = PlaybackPhase::Paused);
                debug!("Playback paused");
                Ok(TransportOutcome::Paused)
            }
            PlaybackPhase::Empty | PlaybackPhase::Loading => Ok(self.nothing_loaded("pause")),
        }
    }

    /// Seek within the loaded entry.
    ///
    /// A backend that cannot seek reports an error but keeps playing.
    #[instrument(skip(self))]
    pub async fn seek(&mut self, position: Duration) -> CoreResult<TransportOutcome> {
        self.ensure_live()?;

        let outcome = match self.phase() {
            PlaybackPhase::Playing => TransportOutcome::Playing,
            PlaybackPhase::Paused => TransportOutcome::Paused,
            PlaybackPhase::Empty | PlaybackPhase::Loading => {
                return Ok(self.nothing_loaded("seek"));
            }
        };

        self.player.seek(position).await?;
        Ok(outcome)
    }

    /// Move a `Playing` session to `Paused` once the player has reached the
    /// end of its source. Returns true when the phase changed.
    ///
    /// The entry stays current, so resuming plays it again from the start.
    #[instrument(skip(self))]
    pub async fn sync_finished(&mut self) -> bool {
        if self.released || self.phase() != PlaybackPhase::Playing {
            return false;
        }
        if !self.player.is_finished().await {
            return false;
        }

        self.state_tx.send_modify(|state| state.phase = PlaybackPhase::Paused);
        info!(id = ?self.state_tx.borrow().current_id(), "Playback reached the end");
        true
    }

    /// Stop playback and free the player. Later calls are no-ops.
    #[instrument(skip(self))]
    pub async fn release(&mut self) -> CoreResult<()> {
        if self.released {
            debug!("Playback session already released");
            return Ok(());
        }
        self.released = true;

        if let Err(e) = self.player.stop().await {
            warn!(error = %e, "Failed to stop player during release");
        }
        self.publish(None, PlaybackPhase::Empty);
        self.player.release().await?;

        info!("Playback session released");

        Ok(())
    }

    fn phase(&self) -> PlaybackPhase {
        self.state_tx.borrow().phase
    }

    fn publish(&self, current: Option<AudioEntry>, phase: PlaybackPhase) {
        self.state_tx.send_replace(PlaybackState { current, phase });
    }

    fn nothing_loaded(&self, request: &'static str) -> TransportOutcome {
        warn!(request, "Nothing loaded, request ignored");
        TransportOutcome::NothingLoaded
    }

    /// Unbind after a failure so no caller sees a half-loaded item.
    async fn fail(&mut self, error: CoreError) -> CoreError {
        warn!(error = %error, "Playback failed, resetting");
        if let Err(e) = self.player.stop().await {
            warn!(error = %e, "Failed to stop player after error");
        }
        self.publish(None, PlaybackPhase::Empty);
        error
    }

    #[track_caller]
    fn ensure_live(&self) -> CoreResult<()> {
        if self.released {
            return Err(CoreError::SessionReleased {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        if !self.released {
            warn!("Playback session dropped without release");
        }
    }
}
