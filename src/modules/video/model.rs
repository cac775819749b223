use std::fmt;
use std::path::{Path, PathBuf};

use mime::Mime;
use uuid::Uuid;

pub const VIDEO_PREFIX: &str = "videos";
pub const THUMBNAIL_PREFIX: &str = "thumbnails";
pub const VIDEO_EXTENSION: &str = "mp4";
pub const THUMBNAIL_EXTENSION: &str = "webp";

/// Namespaces every temporary file and remote key of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transcode,
    Thumbnail,
    Publish,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Transcode => "transcode",
            Stage::Thumbnail => "thumbnail",
            Stage::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Received,
    Transcoding,
    ThumbnailExtracting,
    Uploading,
    Completed,
    Failed { stage: Stage, cause: String },
}

impl JobState {
    /// Forward-only: each working state may move to its successor or fail.
    pub fn can_advance_to(&self, next: &JobState) -> bool {
        use JobState::*;

        matches!(
            (self, next),
            (Received, Transcoding)
                | (Transcoding, ThumbnailExtracting)
                | (ThumbnailExtracting, Uploading)
                | (Uploading, Completed)
                | (Transcoding | ThumbnailExtracting | Uploading, Failed { .. })
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    pub input: PathBuf,
    pub output: PathBuf,
    pub thumbnail: PathBuf,
}

impl JobPaths {
    pub fn all(&self) -> [&Path; 3] {
        [&self.input, &self.output, &self.thumbnail]
    }
}

/// One file to be durably published.
#[derive(Debug, Clone)]
pub struct ArtifactRef {
    pub local_path: PathBuf,
    pub remote_key: String,
    pub content_type: Mime,
}

impl ArtifactRef {
    pub fn new(local_path: impl Into<PathBuf>, remote_key: String) -> Self {
        let content_type = mime_guess::from_path(&remote_key).first_or_octet_stream();
        Self {
            local_path: local_path.into(),
            remote_key,
            content_type,
        }
    }
}

pub fn video_key(id: JobId) -> String {
    format!("{VIDEO_PREFIX}/{id}.{VIDEO_EXTENSION}")
}

pub fn thumbnail_key(id: JobId) -> String {
    format!("{THUMBNAIL_PREFIX}/{id}.{THUMBNAIL_EXTENSION}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutput {
    pub video_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub paths: JobPaths,
    pub state: JobState,
    pub result: Option<JobOutput>,
}

impl Job {
    pub fn received(id: JobId, paths: JobPaths) -> Self {
        Self {
            id,
            paths,
            state: JobState::Received,
            result: None,
        }
    }

    /// Video first, thumbnail second.
    pub fn artifacts(&self) -> [ArtifactRef; 2] {
        [
            ArtifactRef::new(&self.paths.output, video_key(self.id)),
            ArtifactRef::new(&self.paths.thumbnail, thumbnail_key(self.id)),
        ]
    }

    pub(crate) fn advance(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_advance_to(&next),
            "illegal job transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }
}
