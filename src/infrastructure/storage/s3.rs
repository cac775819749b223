use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use tracing::{error, info};

use super::{ObjectStore, StorageError};

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
}

impl StorageService {
    pub fn new(
        endpoint: &str,
        region: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(config);

        info!("✅ Configured object storage (bucket: {})", bucket);

        Self {
            client,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    "S3 upload failed: {}",
                    DisplayErrorContext(&e)
                );
                put_failure(key, &e)
            })?;

        info!("Successfully uploaded: {}", key);
        Ok(())
    }
}

/// Caller-facing failure. Only the top-level SDK error kind is kept; the
/// source chain with connector and endpoint details goes to the log.
fn put_failure<E, R>(key: &str, err: &SdkError<E, R>) -> StorageError {
    StorageError::Put {
        key: key.to_string(),
        message: err.to_string(),
    }
}
