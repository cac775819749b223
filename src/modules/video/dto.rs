use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::{JobId, JobOutput};

pub const SUCCESS_MESSAGE: &str = "Video processed successfully";

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessVideoResponse {
    pub success: bool,
    pub uuid: Uuid,
    pub url: String,
    pub thumbnail: String,
    pub message: String,
}

impl ProcessVideoResponse {
    pub fn completed(id: JobId, output: JobOutput) -> Self {
        Self {
            success: true,
            uuid: id.as_uuid(),
            url: output.video_url,
            thumbnail: output.thumbnail_url,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Multipart form schema for the OpenAPI document.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct VideoUpload {
    #[schema(value_type = String, format = Binary)]
    pub video: Vec<u8>,
}
