//! Sleep-Helper: bedtime stories, white noise and bedside recordings from the
//! console, with global media-key control.

mod active_screen;
mod app;
mod app_command;
mod config;
mod error;
mod external_player;
mod hotkey_handler;
#[cfg(test)]
mod tests;
mod ui_command;

pub(crate) use {
    active_screen::ActiveScreen,
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    external_player::ExternalPlayer,
    hotkey_handler::HotkeyHandler,
    ui_command::UiCommand,
};

use crate::config::Config;

use sleep_helper_core::{
    CaptureBackend, CatalogStore, MediaHost, MicrophoneBackend, PlaybackSession,
};

use std::sync::Arc;

use global_hotkey::GlobalHotKeyManager;
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "sleep_helper=debug,sleep_helper_core=debug";

/// Application entry point.
fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let event_loop = EventLoopBuilder::<UiCommand>::with_user_event().build();
    let ui_proxy = event_loop.create_proxy();

    // Persists across event loop iterations. Dropping it unregisters the hotkey.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(UiCommand::Shutdown) => {
                *control_flow = ControlFlow::ExitWithCode(0);
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let recordings_dir = match config.recordings_dir() {
                    Ok(dir) => dir,
                    Err(e) => {
                        error!("Failed to resolve recordings directory: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                // Register the media key on the main thread. tao's event loop
                // pumps the messages needed for hotkey delivery.
                let hotkey_id = if config.behavior.media_key {
                    match HotkeyHandler::register_hotkey() {
                        Ok((manager, id)) => {
                            hotkey_manager = Some(manager);
                            Some(id)
                        }
                        Err(e) => {
                            warn!(error = ?e, "Media key unavailable, continuing without it");
                            None
                        }
                    }
                } else {
                    info!("Media key disabled in config");
                    None
                };

                // Forward UI commands from the runtime thread into the event loop.
                let (ui_tx, ui_rx) = std::sync::mpsc::channel::<UiCommand>();
                let ui_proxy = ui_proxy.clone();
                std::thread::spawn(move || {
                    while let Ok(cmd) = ui_rx.recv() {
                        if ui_proxy.send_event(cmd).is_err() {
                            break;
                        }
                    }
                });

                // Spawn tokio runtime on separate thread.
                // The event loop and hotkey_manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async move {
                        let capture = MicrophoneBackend::new();
                        let catalog = Arc::new(CatalogStore::new(
                            recordings_dir,
                            capture.file_extension(),
                        ));

                        let player = ExternalPlayer::new(
                            config.playback.player_program.clone(),
                            config.playback.player_args.clone(),
                        )
                        .with_probe_window(config.playback.probe_window());
                        let session =
                            PlaybackSession::new(Box::new(player), config.playback.ready_timeout());
                        let (host, host_task) = MediaHost::spawn(session, Arc::clone(&catalog));

                        let (shutdown_tx, shutdown_rx) = watch::channel(false);
                        let hotkey_handler =
                            hotkey_id.map(|id| HotkeyHandler::new(id, host.clone()));

                        let app = App {
                            catalog,
                            host,
                            capture: Arc::new(capture),
                            recording_timeouts: config.recording.timeouts(),
                            ui_tx,
                            shutdown_tx,
                        };

                        tokio::join!(
                            async {
                                if let Some(handler) = hotkey_handler {
                                    if let Err(e) = handler.run(shutdown_rx).await {
                                        error!(error = ?e, "Hotkey handler error");
                                    }
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );

                        if let Err(e) = host_task.await {
                            error!(error = ?e, "Media host task panicked");
                        }
                    });
                });
            }
            _ => {}
        }

        // Keep hotkey_manager alive in the closure for the app's lifetime.
        let _ = &hotkey_manager;
    });
}
