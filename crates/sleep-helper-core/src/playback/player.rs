use crate::{CoreResult, catalog::AudioSource};

use std::time::Duration;

use async_trait::async_trait;

/// The single platform player resource behind a
/// [`PlaybackSession`](crate::PlaybackSession).
///
/// Implementations must accept both remote and local sources.
#[async_trait]
pub trait MediaPlayer: Send {
    /// Bind to `source`, replacing whatever was bound, and return once the
    /// source is ready to play.
    ///
    /// Unreachable or unsupported sources fail with `PlaybackSourceError`.
    async fn prepare(&mut self, source: &AudioSource) -> CoreResult<()>;

    /// Start or resume output.
    async fn play(&mut self) -> CoreResult<()>;

    /// Pause output, keeping the source bound.
    async fn pause(&mut self) -> CoreResult<()>;

    /// Move to `position` within the bound source.
    async fn seek(&mut self, position: Duration) -> CoreResult<()>;

    /// True once the bound source has played to its end on its own.
    ///
    /// Polled while playing. Players that cannot tell keep the default.
    async fn is_finished(&mut self) -> bool {
        false
    }

    /// Stop output and unbind the source. Safe to call when nothing is bound.
    async fn stop(&mut self) -> CoreResult<()>;

    /// Free the underlying resource. No other method is called afterwards.
    async fn release(&mut self) -> CoreResult<()>;
}
