use crate::{
    catalog::AudioEntry,
    controller::Screen,
    host::HostHandle,
    playback::TransportOutcome,
};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

/// What the player screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
    /// Entry bound to the shared player.
    pub current: Option<AudioEntry>,
    /// Output running.
    pub is_playing: bool,
    /// Waiting for the source to become ready.
    pub is_loading: bool,
    /// Message for the last failed intent.
    pub error: Option<String>,
}

/// Player screen controller. Playback itself belongs to the media host, so
/// leaving the screen does not stop it.
pub struct PlayerController {
    host: HostHandle,
    requested_id: Option<String>,
    state_tx: watch::Sender<PlayerState>,
}

impl PlayerController {
    /// Controller for a visit that should play `requested_id` on enter.
    pub fn new(host: HostHandle, requested_id: Option<String>) -> Self {
        let (state_tx, _) = watch::channel(PlayerState::default());
        let controller = Self {
            host,
            requested_id,
            state_tx,
        };
        controller.sync(None);
        controller
    }

    /// Current snapshot.
    pub fn state(&self) -> PlayerState {
        self.state_tx.borrow().clone()
    }

    /// Receiver observing every update.
    pub fn subscribe(&self) -> watch::Receiver<PlayerState> {
        self.state_tx.subscribe()
    }

    /// Play the entry with `id` unless it is already playing or loading.
    ///
    /// A current entry that is paused, or has played to its end, is loaded
    /// again from the start.
    #[instrument(skip(self))]
    pub async fn load_audio(&self, id: &str) {
        let playback = self.host.state();
        if playback.current_id() == Some(id) && (playback.is_playing() || playback.is_loading()) {
            debug!("Requested entry already playing");
            self.sync(None);
            return;
        }

        self.state_tx.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        match self.host.load(id).await {
            Ok(_) => self.sync(None),
            Err(e) => {
                warn!(error = %e, "Failed to load audio");
                self.sync(Some(e.user_message()));
            }
        }
    }

    /// Pause when playing, resume when paused.
    #[instrument(skip(self))]
    pub async fn toggle_play_pause(&self) {
        match self.host.toggle_play_pause().await {
            Ok(TransportOutcome::NothingLoaded) => {
                self.sync(Some("Nothing is loaded".to_string()));
            }
            Ok(_) => self.sync(None),
            Err(e) => {
                warn!(error = %e, "Failed to toggle playback");
                self.sync(Some(e.user_message()));
            }
        }
    }

    /// Re-read the host state, e.g. after a media key press.
    pub fn refresh(&self) {
        let error = self.state_tx.borrow().error.clone();
        self.sync(error);
    }

    fn sync(&self, error: Option<String>) {
        let playback = self.host.state();
        self.state_tx.send_replace(PlayerState {
            is_playing: playback.is_playing(),
            is_loading: playback.is_loading(),
            current: playback.current,
            error,
        });
    }
}

#[async_trait]
impl Screen for PlayerController {
    async fn on_enter(&mut self) {
        if let Some(id) = self.requested_id.clone() {
            self.load_audio(&id).await;
        } else {
            self.sync(None);
        }
    }

    async fn on_exit(&mut self) {
        debug!("Leaving player, playback continues in the media host");
    }
}
