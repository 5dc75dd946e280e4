use crate::{CoreResult, catalog::AudioEntry, playback::TransportOutcome};

use std::time::Duration;

use tokio::sync::oneshot;

/// Reply channel carried by every command.
pub type Reply<T> = oneshot::Sender<CoreResult<T>>;

/// Requests accepted by the [`MediaHost`](crate::MediaHost), processed in
/// arrival order.
pub enum MediaCommand {
    /// Resolve a catalog id and start playing it.
    Load {
        /// Catalog id to play.
        id: String,
        /// Receives the resolved entry.
        reply: Reply<AudioEntry>,
    },
    /// Resume output.
    Play {
        /// Receives the transport outcome.
        reply: Reply<TransportOutcome>,
    },
    /// Pause output.
    Pause {
        /// Receives the transport outcome.
        reply: Reply<TransportOutcome>,
    },
    /// Pause when playing, resume when paused.
    TogglePlayPause {
        /// Receives the transport outcome.
        reply: Reply<TransportOutcome>,
    },
    /// Seek within the loaded entry.
    Seek {
        /// Target position.
        position: Duration,
        /// Receives the transport outcome.
        reply: Reply<TransportOutcome>,
    },
    /// Release the player and stop the host.
    Shutdown {
        /// Receives the release result.
        reply: Reply<()>,
    },
}
