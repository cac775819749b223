use std::sync::Arc;

use bytes::Bytes;
use tokio::fs;
use tracing::info;
use url::Url;

use super::error::PublishError;
use super::model::ArtifactRef;
use crate::infrastructure::storage::ObjectStore;

/// Uploads local artifacts and derives their public URLs from the key.
#[derive(Clone)]
pub struct ArtifactPublisher {
    store: Arc<dyn ObjectStore>,
    public_base: Url,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn ObjectStore>, public_base: Url) -> Self {
        Self { store, public_base }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.public_base.as_str().trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }

    /// Single put, no retry. The local file is left for the caller to remove.
    pub async fn publish(&self, artifact: &ArtifactRef) -> Result<String, PublishError> {
        let key = &artifact.remote_key;

        let data = fs::read(&artifact.local_path)
            .await
            .map_err(|source| PublishError::Read {
                key: key.clone(),
                source,
            })?;
        let size = data.len();

        self.store
            .put(key, Bytes::from(data), artifact.content_type.essence_str())
            .await
            .map_err(|source| PublishError::Store {
                key: key.clone(),
                source,
            })?;

        info!(key = %key, size_bytes = size, "Artifact published");
        Ok(self.public_url(key))
    }
}
