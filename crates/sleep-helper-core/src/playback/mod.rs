mod player;
mod session;
mod state;

pub use {
    player::MediaPlayer,
    session::{DEFAULT_READY_TIMEOUT, PlaybackSession},
    state::{PlaybackPhase, PlaybackState, TransportOutcome},
};
