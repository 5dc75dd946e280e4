//! Sleep Helper Core Library
//!
//! Audio catalog, microphone recording and playback session state for the
//! bedtime-story player.
//!
//! # Example
//!
//! ```no_run
//! use sleep_helper_core::{
//!     CatalogStore, CoreResult, MicrophoneBackend, RecordingSession, RecordingTimeouts,
//! };
//!
//! use std::{sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let backend = Arc::new(MicrophoneBackend::new());
//!     let mut session = RecordingSession::new(backend, "recordings", RecordingTimeouts::default());
//!
//!     session.start("bedtime").await?;
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     session.stop().await;
//!
//!     let catalog = CatalogStore::new("recordings", "wav");
//!     for entry in catalog.list_all().await? {
//!         println!("{} {}", entry.id, entry.title);
//!     }
//!     Ok(())
//! }
//! ```

mod catalog;
mod controller;
mod error;
mod host;
mod playback;
mod recording;

pub use {
    catalog::{AudioCategory, AudioEntry, AudioSource, CatalogStore, bundled_entries},
    controller::{
        HomeController, HomeState, PlayerController, PlayerState, RecorderController,
        RecorderState, Screen,
    },
    error::{CoreError, Result as CoreResult},
    host::{HostHandle, MediaCommand, MediaHost, Reply},
    playback::{
        DEFAULT_READY_TIMEOUT, MediaPlayer, PlaybackPhase, PlaybackSession, PlaybackState,
        TransportOutcome,
    },
    recording::{
        ActiveCapture, CaptureBackend, CaptureSummary, DEFAULT_FINALIZE_TIMEOUT,
        DEFAULT_START_TIMEOUT, MicrophoneBackend, RecordingOutcome, RecordingSession,
        RecordingState, RecordingTimeouts,
    },
};

#[cfg(test)]
mod tests;
