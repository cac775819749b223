use std::fmt;
use std::io;

use thiserror::Error;

use super::model::Stage;
use crate::infrastructure::media::TranscodeError;
use crate::infrastructure::storage::StorageError;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not read artifact for {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("upload of {key} failed: {source}")]
    Store {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl PublishError {
    pub fn key(&self) -> &str {
        match self {
            PublishError::Read { key, .. } | PublishError::Store { key, .. } => key,
        }
    }
}

/// Terminal failure of a job, tagged with the stage that produced it.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("transcode failed: {0}")]
    Transcode(#[source] TranscodeError),

    #[error("thumbnail failed: {0}")]
    Thumbnail(#[source] TranscodeError),

    #[error("publish failed: {}", PublishFailures(.0))]
    Publish(Vec<PublishError>),
}

impl JobError {
    pub fn stage(&self) -> Stage {
        match self {
            JobError::Transcode(_) => Stage::Transcode,
            JobError::Thumbnail(_) => Stage::Thumbnail,
            JobError::Publish(_) => Stage::Publish,
        }
    }
}

struct PublishFailures<'a>(&'a [PublishError]);

impl fmt::Display for PublishFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
