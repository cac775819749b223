use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::env::{self, EnvKey};

/// Upload ceiling enforced at the HTTP boundary.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub r2_endpoint: String,
    pub r2_bucket: String,
    pub r2_region: String,
    pub r2_access_key: String,
    pub r2_secret_key: String,
    pub public_base_url: Url,
    pub cms_secret: String,
    pub tmp_dir: PathBuf,
    pub watermark_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub ffmpeg_threads: u16,
    pub ffmpeg_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let public_base_url = required(EnvKey::PublicBaseUrl)?;
        let public_base_url = Url::parse(&public_base_url).map_err(|e| ConfigError::Invalid {
            key: EnvKey::PublicBaseUrl.as_str(),
            reason: e.to_string(),
        })?;

        let cms_secret = required(EnvKey::CmsSecret)?;
        if cms_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: EnvKey::CmsSecret.as_str(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3001),
            r2_endpoint: required(EnvKey::R2Endpoint)?,
            r2_bucket: required(EnvKey::R2Bucket)?,
            r2_region: env::get_or(EnvKey::R2Region, "auto"),
            r2_access_key: required(EnvKey::R2AccessKey)?,
            r2_secret_key: required(EnvKey::R2SecretKey)?,
            public_base_url,
            cms_secret,
            tmp_dir: PathBuf::from(env::get_or(EnvKey::TmpDir, "tmp")),
            watermark_path: PathBuf::from(env::get_or(EnvKey::WatermarkPath, "watermark.png")),
            ffmpeg_path: PathBuf::from(env::get_or(EnvKey::FfmpegPath, "ffmpeg")),
            ffmpeg_threads: env::get_parsed(EnvKey::FfmpegThreads, 2),
            ffmpeg_timeout: Duration::from_secs(env::get_parsed(EnvKey::FfmpegTimeoutSecs, 900)),
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    let name = key.as_str();
    env::get(key).map_err(|_| ConfigError::Missing(name))
}
