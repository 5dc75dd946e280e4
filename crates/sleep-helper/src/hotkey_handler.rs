//! Global media-key listener.
//!
//! Registers the MediaPlayPause key as a global hotkey and forwards presses
//! to the media host, whichever screen is active.

use crate::{AppError, AppResult};

use sleep_helper_core::{HostHandle, TransportOutcome};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey},
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

/// Forwards media-key presses to the playback host.
pub struct HotkeyHandler {
    hotkey_id: u32,
    host: HostHandle,
}

impl HotkeyHandler {
    /// Register MediaPlayPause as the global hotkey.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao`/`winit` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows. The returned [`GlobalHotKeyManager`] must be
    /// kept alive on that thread for the hotkey to remain registered.
    #[track_caller]
    #[instrument]
    pub fn register_hotkey() -> AppResult<(GlobalHotKeyManager, u32)> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let hotkey = HotKey::new(None, Code::MediaPlayPause);

        manager
            .register(hotkey)
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register MediaPlayPause: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(hotkey = "MediaPlayPause", "Global hotkey registered");

        Ok((manager, hotkey.id()))
    }

    /// Create a handler for a previously registered hotkey.
    ///
    /// The `hotkey_id` should come from [`register_hotkey`](Self::register_hotkey).
    /// This struct is `Send` and can live on any thread; it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(hotkey_id: u32, host: HostHandle) -> Self {
        Self { hotkey_id, host }
    }

    /// Run the hotkey handler event loop.
    ///
    /// This method blocks until a shutdown signal is received.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // One blocking task forwards hotkey events from the crossbeam
        // receiver. It stops on the first failed send after event_rx drops.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.id == self.hotkey_id && event.state == HotKeyState::Pressed {
                        if let Err(e) = self.handle_hotkey_press().await {
                            error!(error = ?e, "Media key press failed");
                        }
                    }
                }
            }
        }

        drop(event_rx);

        // The blocking task may sit in recv() until the next key event, so
        // the join is bounded. The runtime cleans it up on exit.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Toggle the shared player.
    #[instrument(skip(self))]
    pub(crate) async fn handle_hotkey_press(&self) -> AppResult<TransportOutcome> {
        let outcome = self.host.toggle_play_pause().await?;

        match outcome {
            TransportOutcome::NothingLoaded => debug!("Media key pressed with nothing loaded"),
            outcome => info!(?outcome, "Media key toggled playback"),
        }

        Ok(outcome)
    }
}
