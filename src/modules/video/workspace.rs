use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::model::{JobId, JobPaths, THUMBNAIL_EXTENSION, VIDEO_EXTENSION};

const UPLOADS_DIR: &str = "uploads";
const PROCESSED_DIR: &str = "processed";
const THUMBNAILS_DIR: &str = "thumbnails";

/// Local scratch space. Every file name inside it is a job id.
#[derive(Debug, Clone)]
pub struct TempWorkspace {
    root: PathBuf,
}

impl TempWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure(&self) -> io::Result<()> {
        for dir in [UPLOADS_DIR, PROCESSED_DIR, THUMBNAILS_DIR] {
            fs::create_dir_all(self.root.join(dir)).await?;
        }
        Ok(())
    }

    pub fn paths_for(&self, id: JobId) -> JobPaths {
        JobPaths {
            input: self.root.join(UPLOADS_DIR).join(id.to_string()),
            output: self
                .root
                .join(PROCESSED_DIR)
                .join(format!("{id}.{VIDEO_EXTENSION}")),
            thumbnail: self
                .root
                .join(THUMBNAILS_DIR)
                .join(format!("{id}.{THUMBNAIL_EXTENSION}")),
        }
    }
}
