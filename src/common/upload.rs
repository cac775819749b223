use std::io;
use std::path::Path;

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },

    #[error("Uploaded video is empty")]
    Empty,

    #[error("Upload stream interrupted: {}", .0.body_text())]
    Stream(#[from] MultipartError),

    #[error("Failed to store upload")]
    Io(#[from] io::Error),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Empty => StatusCode::BAD_REQUEST,
            UploadError::Stream(e) => e.status(),
            UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Deletes the file on drop unless kept. This also fires when the request
/// future is dropped mid-stream because the client went away.
struct PartialFile<'a> {
    path: &'a Path,
    keep: bool,
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match std::fs::remove_file(self.path) {
            Ok(()) => debug!("Removed partial upload {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to cleanup partial upload {}: {}", self.path.display(), e),
        }
    }
}

/// Streams a multipart field into `path` and returns the number of bytes
/// written. Nothing is left at `path` unless this returns `Ok`.
pub async fn stream_to_file(
    mut field: Field<'_>,
    path: &Path,
    limit: usize,
) -> Result<usize, UploadError> {
    let mut partial = PartialFile { path, keep: false };

    let written = write_field(&mut field, path, limit).await.map_err(|e| {
        error!("Upload error: {}", e);
        e
    })?;
    if written == 0 {
        return Err(UploadError::Empty);
    }

    partial.keep = true;
    Ok(written)
}

async fn write_field(field: &mut Field<'_>, path: &Path, limit: usize) -> Result<usize, UploadError> {
    let mut file = File::create(path).await?;
    let mut written = 0usize;

    while let Some(chunk) = field.next().await {
        let chunk = chunk?;

        written += chunk.len();
        if written > limit {
            return Err(UploadError::TooLarge { limit });
        }

        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(written)
}
