//! [`MediaPlayer`] backed by an external command-line player.
//!
//! Playing a prepared source runs it as one child process, and the process
//! exiting means the source reached its end. Pausing suspends the process on
//! Unix; there is no in-process decoding.

use sleep_helper_core::{AudioSource, CoreError, CoreResult, MediaPlayer};

use std::{panic::Location, process::Stdio, time::Duration};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tokio::process::{Child, Command};
use tracing::{debug, info, instrument, warn};

/// How long a freshly spawned player must stay alive to count as ready.
pub const DEFAULT_PROBE_WINDOW: Duration = Duration::from_millis(300);

/// Runs `<program> <args..> <source>` per prepared source.
pub struct ExternalPlayer {
    program: String,
    args: Vec<String>,
    probe_window: Duration,
    source: Option<AudioSource>,
    child: Option<Child>,
    suspended: bool,
    finished: bool,
}

impl ExternalPlayer {
    /// Player launching `program` with `args` before the source locator.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            probe_window: DEFAULT_PROBE_WINDOW,
            source: None,
            child: None,
            suspended: false,
            finished: false,
        }
    }

    /// Override the readiness probe window.
    pub fn with_probe_window(mut self, probe_window: Duration) -> Self {
        self.probe_window = probe_window;
        self
    }

    /// True while a child process is attached.
    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// Spawn the player for `source` and wait out the probe window.
    async fn launch(&mut self, source: &AudioSource) -> CoreResult<()> {
        let locator = source.locator();
        self.finished = false;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&locator)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CoreError::PlaybackSourceError {
                locator: locator.clone(),
                reason: format!("Failed to launch {}: {}", self.program, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        match tokio::time::timeout(self.probe_window, child.wait()).await {
            Err(_) => {
                debug!(pid = ?child.id(), "Player survived probe window");
                self.child = Some(child);
            }
            Ok(Ok(status)) if status.success() => {
                // Very short sources can finish inside the probe window.
                debug!("Player finished within probe window");
                self.finished = true;
            }
            Ok(Ok(status)) => {
                return Err(CoreError::PlaybackSourceError {
                    locator,
                    reason: format!("{} exited with {}", self.program, status),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Ok(Err(e)) => {
                return Err(CoreError::PlaybackSourceError {
                    locator,
                    reason: format!("Failed to wait for {}: {}", self.program, e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        self.suspended = false;
        Ok(())
    }

    /// Drop the child and mark the source finished if it has exited.
    fn reap_finished(&mut self) {
        if let Some(child) = self.child.as_mut() {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!(%status, "Player process exited");
                    self.child = None;
                    self.suspended = false;
                    self.finished = true;
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Failed to poll player process"),
            }
        }
    }

    fn locator(&self) -> String {
        self.source
            .as_ref()
            .map(AudioSource::locator)
            .unwrap_or_default()
    }

    #[cfg(unix)]
    async fn signal(&self, signal: &str) -> CoreResult<()> {
        let Some(pid) = self.child.as_ref().and_then(Child::id) else {
            return Err(CoreError::PlaybackSourceError {
                locator: self.locator(),
                reason: "No player process".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let status = Command::new("kill")
            .arg(format!("-{signal}"))
            .arg(pid.to_string())
            .status()
            .await?;

        if !status.success() {
            return Err(CoreError::PlaybackSourceError {
                locator: self.locator(),
                reason: format!("Failed to send SIG{signal} to {pid}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(pid, signal, "Signal sent to player");
        Ok(())
    }

    #[cfg(not(unix))]
    async fn signal(&self, _signal: &str) -> CoreResult<()> {
        Err(CoreError::PlaybackSourceError {
            locator: self.locator(),
            reason: "Pause and resume are not supported on this platform".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Check that `source` is something the player can open.
///
/// Local files must exist; remote sources must be http(s).
pub(crate) async fn check_source(source: &AudioSource) -> CoreResult<()> {
    match source {
        AudioSource::Local(path) => match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(CoreError::PlaybackSourceError {
                locator: source.locator(),
                reason: "Not a file".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(e) => Err(CoreError::PlaybackSourceError {
                locator: source.locator(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        },
        AudioSource::Remote(url) => {
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(())
            } else {
                Err(CoreError::PlaybackSourceError {
                    locator: url.clone(),
                    reason: "Unsupported scheme".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }
}

#[async_trait]
impl MediaPlayer for ExternalPlayer {
    #[instrument(skip(self))]
    async fn prepare(&mut self, source: &AudioSource) -> CoreResult<()> {
        self.stop().await?;
        check_source(source).await?;

        self.source = Some(source.clone());
        self.finished = false;

        info!(program = %self.program, source = %source, "Player ready");
        Ok(())
    }

    async fn play(&mut self) -> CoreResult<()> {
        self.reap_finished();

        if self.child.is_none() {
            // Not started yet, or finished on its own: start from the top.
            let Some(source) = self.source.clone() else {
                return Err(CoreError::PlaybackSourceError {
                    locator: String::new(),
                    reason: "Nothing prepared".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            };
            return self.launch(&source).await;
        }

        if self.suspended {
            self.signal("CONT").await?;
            self.suspended = false;
        }
        Ok(())
    }

    async fn pause(&mut self) -> CoreResult<()> {
        self.reap_finished();

        if !self.is_running() || self.suspended {
            return Ok(());
        }

        self.signal("STOP").await?;
        self.suspended = true;
        Ok(())
    }

    async fn is_finished(&mut self) -> bool {
        self.reap_finished();
        self.finished
    }

    async fn seek(&mut self, _position: Duration) -> CoreResult<()> {
        Err(CoreError::PlaybackSourceError {
            locator: self.locator(),
            reason: format!("Seeking is not supported by {}", self.program),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    async fn stop(&mut self) -> CoreResult<()> {
        if let Some(mut child) = self.child.take() {
            // Kill then reap, so no zombie stays behind.
            if let Err(e) = child.kill().await {
                warn!(error = %e, "Failed to kill player process");
            }
            debug!("Player process stopped");
        }
        self.suspended = false;
        self.finished = false;
        Ok(())
    }

    async fn release(&mut self) -> CoreResult<()> {
        self.stop().await?;
        self.source = None;
        Ok(())
    }
}
