//! Job orchestration: drives one upload through transcode, thumbnail and
//! publish, then removes every temporary file whatever the outcome.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::error::JobError;
use super::model::{Job, JobOutput, JobState};
use super::publisher::ArtifactPublisher;
use crate::common::{cleanup, fanout};
use crate::infrastructure::media::{Transcoder, WatermarkAsset};

#[derive(Clone)]
pub struct JobOrchestrator {
    transcoder: Arc<dyn Transcoder>,
    publisher: ArtifactPublisher,
    watermark: WatermarkAsset,
}

impl JobOrchestrator {
    pub fn new(
        transcoder: Arc<dyn Transcoder>,
        publisher: ArtifactPublisher,
        watermark: WatermarkAsset,
    ) -> Self {
        Self {
            transcoder,
            publisher,
            watermark,
        }
    }

    /// Runs `job` from its materialized input to published artifacts.
    ///
    /// `job.paths.input` must already exist. On return the job is in a
    /// terminal state and none of its temporary files remain on disk.
    /// Cleanup problems are logged and never change the outcome.
    pub async fn process_job(&self, job: &mut Job) -> Result<JobOutput, JobError> {
        info!(job_id = %job.id, "Processing video: {} -> {}", job.paths.input.display(), job.paths.output.display());

        let outcome = self.run_stages(job).await;

        let warnings = cleanup::sweep(job.paths.all()).await;
        if !warnings.is_empty() {
            warn!(job_id = %job.id, "{} temporary file(s) could not be removed", warnings.len());
        }

        match &outcome {
            Ok(output) => {
                job.result = Some(output.clone());
                job.advance(JobState::Completed);
                info!(job_id = %job.id, "Video processing completed");
            }
            Err(e) => {
                job.advance(JobState::Failed {
                    stage: e.stage(),
                    cause: e.to_string(),
                });
                error!(job_id = %job.id, stage = %e.stage(), "Video processing error: {}", e);
            }
        }

        outcome
    }

    async fn run_stages(&self, job: &mut Job) -> Result<JobOutput, JobError> {
        let watermark = self.watermark.available().await;
        if watermark.is_none() {
            warn!(
                job_id = %job.id,
                "{} not found, processing without watermark",
                self.watermark.path().display()
            );
        }

        job.advance(JobState::Transcoding);
        self.transcoder
            .transcode(&job.paths.input, &job.paths.output, watermark)
            .await
            .map_err(JobError::Transcode)?;

        job.advance(JobState::ThumbnailExtracting);
        self.transcoder
            .extract_thumbnail(&job.paths.output, &job.paths.thumbnail)
            .await
            .map_err(JobError::Thumbnail)?;

        job.advance(JobState::Uploading);
        info!(job_id = %job.id, "Uploading artifacts...");
        let [video, thumbnail] = job.artifacts();
        fanout::settle_all([self.publisher.publish(&video), self.publisher.publish(&thumbnail)])
            .await
            .map_err(JobError::Publish)?;

        Ok(JobOutput {
            video_url: self.publisher.public_url(&video.remote_key),
            thumbnail_url: self.publisher.public_url(&thumbnail.remote_key),
        })
    }
}
