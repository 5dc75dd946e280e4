use crate::{
    ActiveScreen, AppCommand, AppResult, UiCommand,
    active_screen::entry_line,
};

use sleep_helper_core::{
    CaptureBackend, CatalogStore, HomeController, HostHandle, PlayerController,
    RecorderController, RecordingSession, RecordingTimeouts, TransportOutcome,
};

use std::sync::Arc;

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines},
    sync::watch,
};
use tracing::{debug, error, info, instrument, warn};

/// Screens the shell can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Destination {
    Home,
    Player(Option<String>),
    Recorder,
}

/// Console shell hosting the screen controllers.
///
/// Runs on the async runtime thread. Lifecycle events go back to the main
/// thread through `ui_tx` because the event loop must stay on the UI thread.
pub struct App {
    pub(crate) catalog: Arc<CatalogStore>,
    pub(crate) host: HostHandle,
    pub(crate) capture: Arc<dyn CaptureBackend>,
    pub(crate) recording_timeouts: RecordingTimeouts,
    pub(crate) ui_tx: std::sync::mpsc::Sender<UiCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the shell on stdin and stdout until `quit` or end of input.
    #[instrument(skip(self))]
    pub(crate) async fn run(self) -> AppResult<()> {
        info!("Sleep-Helper starting");

        let input = BufReader::new(tokio::io::stdin());
        let mut output = tokio::io::stdout();
        self.run_with(input, &mut output).await
    }

    /// Shell loop over arbitrary input and output streams.
    pub(crate) async fn run_with<R, W>(self, input: R, output: &mut W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut screen = self.enter(Destination::Home).await;

        let result = self.shell_loop(&mut lines, output, &mut screen).await;
        if let Err(e) = &result {
            error!(error = ?e, "Console failed, shutting down");
        }

        screen.as_screen_mut().on_exit().await;

        if let Err(e) = self.host.shutdown().await {
            warn!(error = %e, "Media host shutdown failed");
        }

        let _ = self.shutdown_tx.send(true);
        if self.ui_tx.send(UiCommand::Shutdown).is_err() {
            debug!("UI thread already gone");
        }

        info!("Sleep-Helper shut down successfully");

        result
    }

    async fn shell_loop<R, W>(
        &self,
        lines: &mut Lines<R>,
        output: &mut W,
        screen: &mut ActiveScreen,
    ) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_out(output, AppCommand::USAGE).await?;
        write_out(output, &screen.render()).await?;

        loop {
            output
                .write_all(format!("{}> ", screen.name()).as_bytes())
                .await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                info!("Input closed, shutting down");
                return Ok(());
            };

            let command = match AppCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    debug!(error = %e, "Rejected console input");
                    write_out(output, "Unknown command, type `help`").await?;
                    continue;
                }
            };

            if command == AppCommand::Quit {
                info!("Shutdown requested");
                return Ok(());
            }

            if let Some(message) = self.dispatch(command, screen).await {
                write_out(output, &message).await?;
            }
            write_out(output, &screen.render()).await?;
        }
    }

    /// Apply one command. Returns an extra line to print before the screen.
    #[instrument(skip(self, screen), fields(screen = screen.name()))]
    pub(crate) async fn dispatch(
        &self,
        command: AppCommand,
        screen: &mut ActiveScreen,
    ) -> Option<String> {
        match command {
            AppCommand::Home => {
                self.navigate(screen, Destination::Home).await;
                None
            }
            AppCommand::Play { id } => {
                self.navigate(screen, Destination::Player(Some(id))).await;
                None
            }
            AppCommand::Toggle => match screen {
                ActiveScreen::Player(controller) => {
                    controller.toggle_play_pause().await;
                    None
                }
                _ => Some(self.toggle_from_elsewhere().await),
            },
            AppCommand::Record { name } => {
                if !matches!(screen, ActiveScreen::Recorder(_)) {
                    self.navigate(screen, Destination::Recorder).await;
                }
                if let ActiveScreen::Recorder(controller) = screen {
                    controller.start_recording(&name).await;
                }
                None
            }
            AppCommand::Stop => match screen {
                ActiveScreen::Recorder(controller) => {
                    controller.stop_recording().await;
                    None
                }
                _ => Some("Nothing is recording".to_string()),
            },
            AppCommand::List => Some(self.list().await),
            AppCommand::Help => Some(AppCommand::USAGE.to_string()),
            AppCommand::Quit => None,
        }
    }

    /// Leave the current screen and enter a freshly built one.
    pub(crate) async fn navigate(&self, screen: &mut ActiveScreen, to: Destination) {
        debug!(from = screen.name(), to = ?to, "Navigating");
        screen.as_screen_mut().on_exit().await;
        *screen = self.enter(to).await;
    }

    async fn enter(&self, to: Destination) -> ActiveScreen {
        let mut screen = match to {
            Destination::Home => ActiveScreen::Home(HomeController::new(Arc::clone(&self.catalog))),
            Destination::Player(id) => {
                ActiveScreen::Player(PlayerController::new(self.host.clone(), id))
            }
            Destination::Recorder => {
                let session = RecordingSession::new(
                    Arc::clone(&self.capture),
                    self.catalog.recordings_dir(),
                    self.recording_timeouts,
                );
                ActiveScreen::Recorder(RecorderController::new(session))
            }
        };
        screen.as_screen_mut().on_enter().await;
        screen
    }

    async fn toggle_from_elsewhere(&self) -> String {
        match self.host.toggle_play_pause().await {
            Ok(TransportOutcome::Playing) => "Resumed".to_string(),
            Ok(TransportOutcome::Paused) => "Paused".to_string(),
            Ok(TransportOutcome::NothingLoaded) => "Nothing is loaded".to_string(),
            Err(e) => {
                error!(error = %e, "Toggle failed");
                e.user_message()
            }
        }
    }

    async fn list(&self) -> String {
        match self.catalog.list_all().await {
            Ok(entries) if entries.is_empty() => "Catalog is empty".to_string(),
            Ok(entries) => entries
                .iter()
                .map(entry_line)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                error!(error = %e, "Failed to list catalog");
                e.user_message()
            }
        }
    }
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> AppResult<()> {
    output.write_all(text.trim_end().as_bytes()).await?;
    output.write_all(b"\n").await?;
    Ok(())
}
