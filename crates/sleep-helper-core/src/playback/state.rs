use crate::catalog::AudioEntry;

/// Where the playback state machine is.
///
/// `Empty -> Loading -> Playing <-> Paused`; any phase returns to `Empty` on
/// release or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    /// Nothing bound.
    #[default]
    Empty,
    /// Waiting for the player to confirm the source is ready.
    Loading,
    /// Output running.
    Playing,
    /// Output paused with the source still bound.
    Paused,
}

/// Snapshot published by a [`PlaybackSession`](crate::PlaybackSession).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaybackState {
    /// Entry bound to the player, if any.
    pub current: Option<AudioEntry>,
    /// State machine phase.
    pub phase: PlaybackPhase,
}

impl PlaybackState {
    /// True while output is running.
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    /// True while waiting for the source to become ready.
    pub fn is_loading(&self) -> bool {
        self.phase == PlaybackPhase::Loading
    }

    /// Id of the bound entry.
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|entry| entry.id.as_str())
    }
}

/// Result of a transport request (play, pause, toggle, seek).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOutcome {
    /// Output is running afterwards.
    Playing,
    /// Output is paused afterwards.
    Paused,
    /// Nothing was loaded; the request was ignored.
    NothingLoaded,
}
