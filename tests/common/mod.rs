#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;
use url::Url;

use video_processor::config::settings::AppConfig;
use video_processor::infrastructure::media::{TranscodeError, Transcoder, WatermarkAsset};
use video_processor::infrastructure::storage::{ObjectStore, StorageError};
use video_processor::modules::video::model::{Job, JobId};
use video_processor::modules::video::publisher::ArtifactPublisher;
use video_processor::modules::video::service::JobOrchestrator;
use video_processor::modules::video::workspace::TempWorkspace;
use video_processor::{AppState, create_app};

pub const PUBLIC_BASE: &str = "https://img.example.com";
pub const SECRET: &str = "test-secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nothing,
    Transcode,
    Thumbnail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Transcode { watermark: Option<PathBuf> },
    Thumbnail { input: PathBuf },
}

/// Stands in for ffmpeg: the "encoded" output is the input with a prefix.
/// Failing stages still leave a partial output behind.
pub struct FakeTranscoder {
    fail_at: FailAt,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeTranscoder {
    pub fn new(fail_at: FailAt) -> Self {
        Self {
            fail_at,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn produce(&self, input: &Path, output: &Path, prefix: &[u8], fail: bool) -> Result<(), TranscodeError> {
        let data = tokio::fs::read(input).await.map_err(TranscodeError::Spawn)?;
        let mut encoded = prefix.to_vec();
        encoded.extend_from_slice(&data);
        tokio::fs::write(output, encoded).await.map_err(TranscodeError::Spawn)?;

        if fail {
            return Err(TranscodeError::Timeout(Duration::from_secs(1)));
        }
        Ok(())
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        watermark: Option<&Path>,
    ) -> Result<(), TranscodeError> {
        self.calls.lock().unwrap().push(Call::Transcode {
            watermark: watermark.map(Path::to_path_buf),
        });
        self.produce(input, output, b"mp4:", self.fail_at == FailAt::Transcode).await
    }

    async fn extract_thumbnail(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        self.calls.lock().unwrap().push(Call::Thumbnail {
            input: input.to_path_buf(),
        });
        self.produce(input, output, b"webp:", self.fail_at == FailAt::Thumbnail).await
    }
}

/// In-memory object store that rejects keys under the given prefixes.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    reject_prefixes: Vec<&'static str>,
}

impl MemoryStore {
    pub fn rejecting(prefixes: &[&'static str]) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            reject_prefixes: prefixes.to_vec(),
        }
    }

    pub fn get(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        // Let the sibling upload get in flight before deciding.
        tokio::task::yield_now().await;

        if self.reject_prefixes.iter().any(|p| key.starts_with(p)) {
            return Err(StorageError::Put {
                key: key.to_string(),
                message: "service unavailable".to_string(),
            });
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body.to_vec(), content_type.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub dir: TempDir,
    pub workspace: TempWorkspace,
    pub watermark: WatermarkAsset,
    pub transcoder: Arc<FakeTranscoder>,
    pub store: Arc<MemoryStore>,
    pub orchestrator: JobOrchestrator,
}

impl Harness {
    pub async fn new(fail_at: FailAt, store: MemoryStore) -> Self {
        let dir = TempDir::new().unwrap();
        let workspace = TempWorkspace::new(dir.path().join("tmp"));
        workspace.ensure().await.unwrap();

        let watermark = WatermarkAsset::new(dir.path().join("watermark.png"));
        let transcoder = Arc::new(FakeTranscoder::new(fail_at));
        let store = Arc::new(store);
        let publisher = ArtifactPublisher::new(store.clone(), Url::parse(PUBLIC_BASE).unwrap());
        let orchestrator = JobOrchestrator::new(transcoder.clone(), publisher, watermark.clone());

        Self {
            dir,
            workspace,
            watermark,
            transcoder,
            store,
            orchestrator,
        }
    }

    pub fn install_watermark(&self) {
        std::fs::write(self.watermark.path(), b"png").unwrap();
    }

    /// Writes `data` as a job's input the way the upload handler does.
    pub async fn materialize(&self, data: &[u8]) -> Job {
        let id = JobId::new();
        let paths = self.workspace.paths_for(id);
        tokio::fs::write(&paths.input, data).await.unwrap();
        Job::received(id, paths)
    }

    pub fn config(&self, max_upload_bytes: usize) -> AppConfig {
        AppConfig {
            server_port: 0,
            r2_endpoint: "http://127.0.0.1:9".to_string(),
            r2_bucket: "test".to_string(),
            r2_region: "auto".to_string(),
            r2_access_key: "key".to_string(),
            r2_secret_key: "secret".to_string(),
            public_base_url: Url::parse(PUBLIC_BASE).unwrap(),
            cms_secret: SECRET.to_string(),
            tmp_dir: self.workspace.root().to_path_buf(),
            watermark_path: self.watermark.path().to_path_buf(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffmpeg_threads: 2,
            ffmpeg_timeout: Duration::from_secs(5),
            max_upload_bytes,
        }
    }

    pub fn app(&self, max_upload_bytes: usize) -> axum::Router {
        let state = AppState::new(
            self.config(max_upload_bytes),
            self.workspace.clone(),
            self.orchestrator.clone(),
        );
        create_app(state)
    }

    /// Every file left anywhere in the temp workspace.
    pub fn leftover_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for sub in ["uploads", "processed", "thumbnails"] {
            for entry in std::fs::read_dir(self.workspace.root().join(sub)).unwrap() {
                files.push(entry.unwrap().path());
            }
        }
        files
    }
}

pub const BOUNDARY: &str = "----video-processor-test-boundary";

/// Builds a multipart/form-data body from `(field, filename, bytes)` parts.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: video/mp4\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
