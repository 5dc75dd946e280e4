//! Default-microphone capture writing 16-bit mono WAV files.

use crate::{
    CoreError, CoreResult,
    recording::{ActiveCapture, CaptureBackend, CaptureSummary},
};

use std::{
    fs::File,
    io::BufWriter,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
        mpsc,
    },
    thread::JoinHandle,
};

use async_trait::async_trait;
use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument, warn};

type SharedWriter = Arc<Mutex<Option<WavWriter<BufWriter<File>>>>>;

/// Captures from the host's default input device.
///
/// Each capture runs on its own thread because `cpal::Stream` is not `Send`
/// on every platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct MicrophoneBackend;

impl MicrophoneBackend {
    /// Create the backend. The device is resolved on every `begin`.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CaptureBackend for MicrophoneBackend {
    fn file_extension(&self) -> &str {
        "wav"
    }

    #[instrument(skip(self))]
    async fn begin(&self, output: &Path) -> CoreResult<Box<dyn ActiveCapture>> {
        let (ready_tx, ready_rx) = oneshot::channel();
        // Dropping stop_tx (e.g. when this future is cancelled) also ends the thread.
        let (stop_tx, stop_rx) = mpsc::channel();
        let thread_output = output.to_path_buf();

        let thread = std::thread::Builder::new()
            .name("microphone-capture".to_string())
            .spawn(move || run_capture(thread_output, ready_tx, stop_rx))
            .map_err(|e| CoreError::CaptureUnavailable {
                reason: format!("Failed to spawn capture thread: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        match ready_rx.await {
            Ok(Ok(sample_rate)) => Ok(Box::new(MicrophoneCapture {
                output: output.to_path_buf(),
                stop_tx: Some(stop_tx),
                thread: Some(thread),
                sample_rate,
            })),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CoreError::CaptureUnavailable {
                reason: "Capture thread exited before starting".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

struct MicrophoneCapture {
    output: PathBuf,
    stop_tx: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<CoreResult<CaptureSummary>>>,
    sample_rate: u32,
}

#[async_trait]
impl ActiveCapture for MicrophoneCapture {
    async fn finish(mut self: Box<Self>) -> CoreResult<CaptureSummary> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        let Some(thread) = self.thread.take() else {
            return Err(self.incomplete("capture already finished"));
        };

        match tokio::task::spawn_blocking(move || thread.join()).await {
            Ok(Ok(result)) => {
                if let Ok(summary) = &result {
                    debug!(
                        frames = summary.frames,
                        sample_rate = self.sample_rate,
                        "Capture finalized"
                    );
                }
                result
            }
            Ok(Err(_)) => Err(self.incomplete("capture thread panicked")),
            Err(e) => Err(self.incomplete(&e.to_string())),
        }
    }
}

impl MicrophoneCapture {
    #[track_caller]
    fn incomplete(&self, reason: &str) -> CoreError {
        CoreError::IncompleteRecording {
            output: self.output.clone(),
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl Drop for MicrophoneCapture {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

/// Body of the capture thread: open, report readiness, wait, finalize.
fn run_capture(
    output: PathBuf,
    ready_tx: oneshot::Sender<CoreResult<u32>>,
    stop_rx: mpsc::Receiver<()>,
) -> CoreResult<CaptureSummary> {
    let opened = match open_stream(&output) {
        Ok(opened) => opened,
        Err(e) => {
            let reason = e.to_string();
            let _ = ready_tx.send(Err(e));
            return Err(CoreError::CaptureUnavailable {
                reason,
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    let sample_rate = opened.sample_rate;
    if ready_tx.send(Ok(sample_rate)).is_err() {
        debug!("Capture start abandoned by caller, discarding output");
        opened.discard(&output);
        return Err(CoreError::CaptureUnavailable {
            reason: "Capture start abandoned".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    // Returns on an explicit stop or when the handle is dropped.
    let _ = stop_rx.recv();

    opened.close(&output)
}

struct OpenStream {
    stream: Stream,
    writer: SharedWriter,
    frames: Arc<AtomicU64>,
    /// Signals the audio callback to stop writing before the stream is dropped.
    shutdown: Arc<AtomicBool>,
    sample_rate: u32,
}

#[track_caller]
fn open_stream(output: &Path) -> CoreResult<OpenStream> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or(CoreError::CaptureUnavailable {
            reason: "No microphone found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let config = device
        .default_input_config()
        .map_err(|e| CoreError::CaptureUnavailable {
            reason: format!("Failed to get config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let sample_rate = config.sample_rate();
    let channels = usize::from(config.channels()).max(1);

    // Filled once the stream runs; until then the callback drops samples.
    let writer: SharedWriter = Arc::new(Mutex::new(None));
    let frames = Arc::new(AtomicU64::new(0));
    let shutdown = Arc::new(AtomicBool::new(false));

    let cb_writer = Arc::clone(&writer);
    let cb_frames = Arc::clone(&frames);
    let cb_shutdown = Arc::clone(&shutdown);

    let stream = device
        .build_input_stream(
            &config.into(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if cb_shutdown.load(Ordering::Acquire) {
                    return;
                }
                let mut guard = cb_writer.lock().unwrap_or_else(|e| {
                    error!("WAV writer lock poisoned, recovering: {}", e);
                    e.into_inner()
                });
                let Some(writer) = guard.as_mut() else {
                    return;
                };
                for frame in data.chunks(channels) {
                    let mono = frame.iter().sum::<f32>() / frame.len() as f32;
                    let sample = (mono.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
                    if let Err(e) = writer.write_sample(sample) {
                        error!("Failed to write sample: {}", e);
                        return;
                    }
                    cb_frames.fetch_add(1, Ordering::Relaxed);
                }
            },
            |err| {
                error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| CoreError::CaptureUnavailable {
            reason: format!("Failed to build stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    stream.play().map_err(|e| CoreError::CaptureUnavailable {
        reason: format!("Failed to start stream: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let wav = WavWriter::create(output, spec).map_err(|e| CoreError::CaptureUnavailable {
        reason: format!("Failed to create {:?}: {}", output, e),
        location: ErrorLocation::from(Location::caller()),
    })?;
    *writer.lock().unwrap_or_else(|e| e.into_inner()) = Some(wav);

    info!(sample_rate, channels, output = ?output, "Microphone capture started");

    Ok(OpenStream {
        stream,
        writer,
        frames,
        shutdown,
        sample_rate,
    })
}

impl OpenStream {
    /// Stop the stream and delete the partial file.
    fn discard(self, output: &Path) {
        self.shutdown.store(true, Ordering::Release);
        drop(self.stream);
        drop(self.writer.lock().unwrap_or_else(|e| e.into_inner()).take());

        match std::fs::remove_file(output) {
            Ok(()) => debug!(output = ?output, "Discarded unused capture file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, output = ?output, "Failed to discard capture file"),
        }
    }

    #[track_caller]
    fn close(self, output: &Path) -> CoreResult<CaptureSummary> {
        self.shutdown.store(true, Ordering::Release);
        drop(self.stream);

        let writer = self
            .writer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        let frames = self.frames.load(Ordering::Acquire);

        let incomplete = |reason: String| CoreError::IncompleteRecording {
            output: output.to_path_buf(),
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let Some(writer) = writer else {
            return Err(incomplete("WAV writer missing".to_string()));
        };
        writer
            .finalize()
            .map_err(|e| incomplete(format!("Failed to finalize WAV: {}", e)))?;

        if frames == 0 {
            return Err(incomplete("no audio captured".to_string()));
        }

        info!(frames, output = ?output, "Microphone capture stopped");

        Ok(CaptureSummary {
            frames,
            sample_rate: self.sample_rate,
        })
    }
}
