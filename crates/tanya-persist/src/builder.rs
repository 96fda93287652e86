use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dbs::memory::InMemoryPersistenceClient;
use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

/// Which backend a deployment persists to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongodb,
    Memory,
}

pub struct PersistenceBuilder {
    backend: StorageBackend,
    mongodb_uri: Option<String>,
    database: Option<String>,
    audio_bucket: String,
    public_audio_base_url: Option<String>,
}

impl PersistenceBuilder {
    pub fn new() -> Self {
        Self {
            backend: StorageBackend::default(),
            mongodb_uri: None,
            database: None,
            audio_bucket: "audio".to_string(),
            public_audio_base_url: None,
        }
    }

    pub fn backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub fn audio_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.audio_bucket = bucket.into();
        self
    }

    pub fn public_audio_base_url(mut self, base_url: Option<String>) -> Self {
        self.public_audio_base_url = base_url.filter(|url| !url.is_empty());
        self
    }

    pub async fn build(self) -> Result<Arc<dyn PersistenceClient>> {
        match self.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory persistence; data is lost on restart");
                Ok(Arc::new(
                    InMemoryPersistenceClient::new()
                        .with_public_audio_base_url(self.public_audio_base_url),
                ))
            }
            StorageBackend::Mongodb => self.build_mongo().await,
        }
    }

    #[cfg(feature = "mongodb")]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        let mongodb_uri = self
            .mongodb_uri
            .ok_or_else(|| PersistError::Config("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .ok_or_else(|| PersistError::Config("database is required".to_string()))?;

        let client = crate::dbs::mongo::MongoPersistenceClient::connect(
            &mongodb_uri,
            &database,
            &self.audio_bucket,
            self.public_audio_base_url,
        )
        .await?;
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        Err(PersistError::Config(
            "MongoDB backend requested but the `mongodb` feature is disabled".to_string(),
        ))
    }
}

impl Default for PersistenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        let backend: StorageBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, StorageBackend::Memory);
        assert_eq!(StorageBackend::default(), StorageBackend::Mongodb);
    }

    #[tokio::test]
    async fn test_memory_backend_builds() {
        let client = PersistenceBuilder::new()
            .backend(StorageBackend::Memory)
            .build()
            .await
            .unwrap();

        client.ping().await.unwrap();
    }

    #[cfg(feature = "mongodb")]
    #[tokio::test]
    async fn test_mongo_backend_requires_uri() {
        let err = PersistenceBuilder::new().database("tanya").build().await.err().unwrap();
        assert!(err.to_string().contains("mongodb_uri"));
    }
}
