use utoipa::OpenApi;
use crate::common::response::ErrorResponse;
use crate::modules::health::HealthResponse;
use crate::modules::video::dto::{ProcessVideoResponse, VideoUpload};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::health,
        crate::modules::video::handler::process_video,
    ),
    components(
        schemas(HealthResponse, ProcessVideoResponse, VideoUpload, ErrorResponse)
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Video", description = "Watermarking, thumbnailing and publishing of uploaded videos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}
