use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use video_processor::config::settings::AppConfig;
use video_processor::infrastructure::media::{FfmpegTranscoder, WatermarkAsset};
use video_processor::infrastructure::storage::s3::StorageService;
use video_processor::modules::video::publisher::ArtifactPublisher;
use video_processor::modules::video::service::JobOrchestrator;
use video_processor::modules::video::workspace::TempWorkspace;
use video_processor::{AppState, create_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("Failed to load configuration")?;

    if which::which(&config.ffmpeg_path).is_err() {
        warn!("{} not found, every job will fail until it is installed", config.ffmpeg_path.display());
    }

    let workspace = TempWorkspace::new(&config.tmp_dir);
    workspace
        .ensure()
        .await
        .with_context(|| format!("Failed to create temp workspace at {}", workspace.root().display()))?;

    let storage = StorageService::new(
        &config.r2_endpoint,
        &config.r2_region,
        &config.r2_bucket,
        &config.r2_access_key,
        &config.r2_secret_key,
    );
    let publisher = ArtifactPublisher::new(Arc::new(storage), config.public_base_url.clone());

    let transcoder = FfmpegTranscoder::new(
        config.ffmpeg_path.clone(),
        config.ffmpeg_threads,
        config.ffmpeg_timeout,
    );

    let watermark = WatermarkAsset::new(&config.watermark_path);
    watermark.log_status().await;

    let orchestrator = JobOrchestrator::new(Arc::new(transcoder), publisher, watermark);
    let state = AppState::new(config.clone(), workspace, orchestrator);
    let app = create_app(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎬 Video processing server running on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
