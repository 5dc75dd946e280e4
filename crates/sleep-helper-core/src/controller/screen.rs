use async_trait::async_trait;

/// Lifecycle callbacks invoked by the hosting shell.
///
/// `on_enter` runs every time the screen becomes visible, `on_exit` when it
/// is torn down. Controllers are rebuilt on each visit.
#[async_trait]
pub trait Screen: Send {
    /// The screen became visible.
    async fn on_enter(&mut self);

    /// The screen is being torn down.
    async fn on_exit(&mut self);
}
