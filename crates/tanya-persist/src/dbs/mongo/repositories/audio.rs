use futures::{AsyncReadExt, AsyncWriteExt, TryStreamExt};
use mongodb::bson::doc;
use mongodb::gridfs::GridFsBucket;
use mongodb::options::GridFsBucketOptions;
use mongodb::Client;

use crate::error::{PersistError, Result};
use crate::models::StoredAudio;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// GridFS-backed audio storage; the storage key is the GridFS filename
#[derive(Clone)]
pub struct MongoAudioRepository {
    bucket: GridFsBucket,
}

impl MongoAudioRepository {
    pub fn new(client: &Client, db_name: &str, bucket_name: &str) -> Self {
        let options = GridFsBucketOptions::builder()
            .bucket_name(bucket_name.to_string())
            .build();
        let bucket = client.database(db_name).gridfs_bucket(options);
        Self { bucket }
    }

    /// Fails when `key` is already taken; stored audio is never replaced
    pub async fn upload(&self, key: &str, content_type: &str, data: &[u8]) -> Result<()> {
        let mut existing = self
            .bucket
            .find(doc! { "filename": key })
            .limit(1)
            .await?;
        if existing.try_next().await?.is_some() {
            return Err(PersistError::Storage(format!("Audio already exists: {}", key)));
        }

        let mut upload = self
            .bucket
            .open_upload_stream(key)
            .metadata(doc! { "content_type": content_type })
            .await?;

        upload
            .write_all(data)
            .await
            .map_err(|e| PersistError::Storage(format!("GridFS write failed: {}", e)))?;
        upload
            .close()
            .await
            .map_err(|e| PersistError::Storage(format!("GridFS close failed: {}", e)))?;

        tracing::debug!(key = %key, bytes = data.len(), "Stored audio in GridFS");
        Ok(())
    }

    /// Audio stored under `key`
    pub async fn download(&self, key: &str) -> Result<Option<StoredAudio>> {
        let mut files = self
            .bucket
            .find(doc! { "filename": key })
            .sort(doc! { "uploadDate": -1 })
            .limit(1)
            .await?;
        let Some(file) = files.try_next().await? else {
            return Ok(None);
        };

        let content_type = file
            .metadata
            .as_ref()
            .and_then(|m| m.get_str("content_type").ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let mut download = self.bucket.open_download_stream(file.id).await?;
        let mut data = Vec::new();
        download
            .read_to_end(&mut data)
            .await
            .map_err(|e| PersistError::Storage(format!("GridFS read failed: {}", e)))?;

        Ok(Some(StoredAudio { content_type, data }))
    }
}
