/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns the `tao` event loop and the hotkey manager, so
/// process lifecycle events flow through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
