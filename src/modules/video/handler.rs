use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use super::dto::{ProcessVideoResponse, VideoUpload};
use super::model::{Job, JobId};
use crate::common::cleanup;
use crate::common::response::{ApiError, ApiSuccess, DetailedApiError, ErrorResponse};
use crate::common::upload::stream_to_file;
use crate::state::AppState;

pub const VIDEO_FIELD: &str = "video";

/// Process Video
/// Transcodes the uploaded video (watermarked when the asset is present),
/// extracts a thumbnail and publishes both.
#[utoipa::path(
    post,
    path = "/api/process-video",
    request_body(content = VideoUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video processed", body = ProcessVideoResponse),
        (status = 400, description = "No video file provided", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Video processing failed", body = ErrorResponse)
    ),
    tag = "Video",
    security(("bearer_auth" = []))
)]
pub async fn process_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Rejected non-multipart upload: {}", rejection.body_text());
            return no_video_provided();
        }
    };

    // 1. Materialize the upload under a fresh job id
    let mut received = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return ApiError(e.body_text(), e.status()).into_response(),
        };

        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let id = JobId::new();
        let paths = state.workspace.paths_for(id);
        info!(
            job_id = %id,
            file_name = field.file_name().unwrap_or("-"),
            "Receiving upload"
        );

        if let Err(e) = stream_to_file(field, &paths.input, state.config.max_upload_bytes).await {
            return ApiError(e.to_string(), e.status()).into_response();
        }

        received = Some(Job::received(id, paths));
        break;
    }

    let Some(mut job) = received else {
        return no_video_provided();
    };

    // 2. Run the job on its own task so a client disconnect cannot skip cleanup
    let id = job.id;
    let paths = job.paths.clone();
    let orchestrator = state.orchestrator.clone();
    let handle = tokio::spawn(async move { orchestrator.process_job(&mut job).await });

    match handle.await {
        Ok(Ok(output)) => {
            ApiSuccess(ProcessVideoResponse::completed(id, output), StatusCode::OK).into_response()
        }
        Ok(Err(e)) => DetailedApiError(
            "Video processing failed".to_string(),
            e.to_string(),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .into_response(),
        Err(e) => {
            error!(job_id = %id, "Job task aborted: {}", e);
            cleanup::sweep(paths.all()).await;
            ApiError(
                "Internal server error".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response()
        }
    }
}

fn no_video_provided() -> Response {
    ApiError("No video file provided".to_string(), StatusCode::BAD_REQUEST).into_response()
}
