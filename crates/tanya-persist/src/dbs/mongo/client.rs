use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::Client;
use uuid::Uuid;

use crate::dbs::mongo::models::{MongoMessage, MongoThread};
use crate::dbs::mongo::repositories::{
    MongoAudioRepository, MongoMessageRepository, MongoThreadRepository,
};
use crate::error::{PersistError, Result};
use crate::models::{
    audio_reference, AudioBlob, Message, NewMessage, NewThread, StoredAudio, Thread, ThreadUpdate,
};
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    client: Client,
    database: String,
    thread_repo: MongoThreadRepository,
    message_repo: MongoMessageRepository,
    audio_repo: MongoAudioRepository,
    public_audio_base_url: Option<String>,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and create client
    pub async fn connect(
        mongodb_uri: &str,
        database: &str,
        audio_bucket: &str,
        public_audio_base_url: Option<String>,
    ) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            thread_repo: MongoThreadRepository::new(&client, database),
            message_repo: MongoMessageRepository::new(&client, database),
            audio_repo: MongoAudioRepository::new(&client, database, audio_bucket),
            database: database.to_string(),
            client,
            public_audio_base_url,
        })
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn create_thread(&self, user_id: &str, thread: NewThread) -> Result<Thread> {
        let now = Utc::now();
        let thread = Thread {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: thread.title,
            system_instruction: thread.system_instruction,
            created_at: now,
            updated_at: now,
        };

        let mongo_thread: MongoThread = thread.clone().into();
        self.thread_repo.insert(&mongo_thread).await?;
        Ok(thread)
    }

    async fn get_thread(&self, thread_id: Uuid, user_id: &str) -> Result<Option<Thread>> {
        self.thread_repo
            .get_thread(&thread_id.to_string(), user_id)
            .await?
            .map(Thread::try_from)
            .transpose()
    }

    async fn list_threads(&self, user_id: &str, limit: i64, skip: u64) -> Result<Vec<Thread>> {
        self.thread_repo
            .list_threads(user_id, limit, skip)
            .await?
            .into_iter()
            .map(Thread::try_from)
            .collect()
    }

    async fn update_thread(
        &self,
        thread_id: Uuid,
        user_id: &str,
        update: ThreadUpdate,
    ) -> Result<Option<Thread>> {
        self.thread_repo
            .update_thread(&thread_id.to_string(), user_id, update)
            .await?
            .map(Thread::try_from)
            .transpose()
    }

    async fn delete_thread(&self, thread_id: Uuid, user_id: &str) -> Result<bool> {
        let thread_id = thread_id.to_string();
        if !self.thread_repo.delete_thread(&thread_id, user_id).await? {
            return Ok(false);
        }

        let removed = self.message_repo.delete_for_thread(&thread_id).await?;
        tracing::debug!(thread_id = %thread_id, messages = removed, "Deleted thread");
        Ok(true)
    }

    async fn add_message(&self, message: NewMessage) -> Result<Message> {
        let now = Utc::now();
        let thread_id = message.thread_id.to_string();
        if !self.thread_repo.touch(&thread_id, now).await? {
            return Err(PersistError::ThreadNotFound(thread_id));
        }

        let message = message.into_message(now);
        let mongo_message: MongoMessage = message.clone().into();
        self.message_repo.save_message(&mongo_message).await?;
        Ok(message)
    }

    async fn get_messages(&self, thread_id: Uuid) -> Result<Vec<Message>> {
        self.message_repo
            .get_messages(&thread_id.to_string())
            .await?
            .into_iter()
            .map(Message::try_from)
            .collect()
    }

    async fn get_message(&self, message_id: Uuid) -> Result<Option<Message>> {
        self.message_repo
            .get_message(&message_id.to_string())
            .await?
            .map(Message::try_from)
            .transpose()
    }

    async fn upload_audio(&self, blob: AudioBlob) -> Result<String> {
        let key = blob.key();
        self.audio_repo
            .upload(&key, &blob.content_type, &blob.data)
            .await?;
        Ok(audio_reference(self.public_audio_base_url.as_deref(), &key))
    }

    async fn load_audio(&self, key: &str) -> Result<Option<StoredAudio>> {
        self.audio_repo.download(key).await
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
