use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    R2Endpoint,
    R2Bucket,
    R2Region,
    R2AccessKey,
    R2SecretKey,
    PublicBaseUrl,
    CmsSecret,
    TmpDir,
    WatermarkPath,
    FfmpegPath,
    FfmpegThreads,
    FfmpegTimeoutSecs,
    MaxUploadBytes,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::R2Endpoint => "R2_ENDPOINT",
            EnvKey::R2Bucket => "R2_BUCKET",
            EnvKey::R2Region => "R2_REGION",
            EnvKey::R2AccessKey => "R2_ACCESS_KEY",
            EnvKey::R2SecretKey => "R2_SECRET_KEY",
            EnvKey::PublicBaseUrl => "PUBLIC_BASE_URL",
            EnvKey::CmsSecret => "CMS_SECRET",
            EnvKey::TmpDir => "TMP_DIR",
            EnvKey::WatermarkPath => "WATERMARK_PATH",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::FfmpegThreads => "FFMPEG_THREADS",
            EnvKey::FfmpegTimeoutSecs => "FFMPEG_TIMEOUT_SECS",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
