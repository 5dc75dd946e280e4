use crate::CoreResult;

use std::path::Path;

use async_trait::async_trait;

/// What a finished capture produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSummary {
    /// Frames written to the output file.
    pub frames: u64,
    /// Sample rate of the output file.
    pub sample_rate: u32,
}

/// Source of capture resources bound to the device microphone.
///
/// Implementations own the container/codec choice and report it through
/// [`CaptureBackend::file_extension`] so the catalog can find the results.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Extension (without the dot) of the files this backend writes.
    fn file_extension(&self) -> &str;

    /// Allocate a capture resource and begin writing to `output`.
    ///
    /// Returns once the platform has confirmed capture is running.
    async fn begin(&self, output: &Path) -> CoreResult<Box<dyn ActiveCapture>>;
}

/// A running capture. Dropping it without [`ActiveCapture::finish`] must
/// still stop the capture and release the device.
#[async_trait]
pub trait ActiveCapture: Send {
    /// Stop capturing, finalize the output and release the device.
    async fn finish(self: Box<Self>) -> CoreResult<CaptureSummary>;
}
