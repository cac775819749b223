use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Static overlay image whose presence toggles the watermark branch.
#[derive(Debug, Clone)]
pub struct WatermarkAsset {
    path: PathBuf,
}

impl WatermarkAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The asset path if the image currently exists.
    pub async fn available(&self) -> Option<&Path> {
        let is_file = tokio::fs::metadata(&self.path)
            .await
            .is_ok_and(|meta| meta.is_file());
        is_file.then_some(self.path.as_path())
    }

    pub async fn log_status(&self) {
        match self.available().await {
            Some(path) => info!("Watermark asset found at {}", path.display()),
            None => warn!(
                "Watermark asset {} not found, videos will be processed without watermark",
                self.path.display()
            ),
        }
    }
}
