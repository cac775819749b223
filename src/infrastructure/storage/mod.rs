use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod s3;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("put {key} failed: {message}")]
    Put { key: String, message: String },
}

/// Durable key/value blob storage. One `put` per call, no retries.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError>;
}
