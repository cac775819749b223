//! Boundary around the external media tool.
//!
//! The rest of the crate only sees [`Transcoder`]: given an input file and an
//! output path, either the output file exists afterwards or an error is
//! returned. Codec work happens in a separate process.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod ffmpeg;
pub mod watermark;

pub use ffmpeg::FfmpegTranscoder;
pub use watermark::WatermarkAsset;

/// Failure of a single media tool invocation.
///
/// The display form is sent to API callers, so it never names local paths.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to launch media tool: {0}")]
    Spawn(#[source] io::Error),

    #[error("media tool failed with {0}")]
    Exit(ExitStatus),

    #[error("media tool did not finish within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("media tool exited successfully but produced no output file")]
    MissingOutput(PathBuf),
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Re-encodes `input` into `output`, overlaying `watermark` when given.
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        watermark: Option<&Path>,
    ) -> Result<(), TranscodeError>;

    /// Writes the first decoded frame of `input` to `output` as a still image.
    async fn extract_thumbnail(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}
