use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{PersistError, Result};
use crate::models::{
    audio_reference, AudioBlob, Message, NewMessage, NewThread, StoredAudio, Thread, ThreadUpdate,
};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
struct Store {
    threads: HashMap<Uuid, Thread>,
    messages: HashMap<Uuid, Vec<Message>>,
    audio: HashMap<String, StoredAudio>,
}

/// Process-local backend for tests and single-instance development
#[derive(Default)]
pub struct InMemoryPersistenceClient {
    store: RwLock<Store>,
    public_audio_base_url: Option<String>,
}

impl InMemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_public_audio_base_url(mut self, base_url: Option<String>) -> Self {
        self.public_audio_base_url = base_url;
        self
    }
}

#[async_trait]
impl PersistenceClient for InMemoryPersistenceClient {
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

        self.store
            .write()
            .await
            .threads
            .insert(thread.id, thread.clone());
        Ok(thread)
    }

    async fn get_thread(&self, thread_id: Uuid, user_id: &str) -> Result<Option<Thread>> {
        let store = self.store.read().await;
        Ok(store
            .threads
            .get(&thread_id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn list_threads(&self, user_id: &str, limit: i64, skip: u64) -> Result<Vec<Thread>> {
        let store = self.store.read().await;
        let mut threads: Vec<Thread> = store
            .threads
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

        Ok(threads
            .into_iter()
            .skip(skip as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn update_thread(
        &self,
        thread_id: Uuid,
        user_id: &str,
        update: ThreadUpdate,
    ) -> Result<Option<Thread>> {
        let mut store = self.store.write().await;
        let Some(thread) = store
            .threads
            .get_mut(&thread_id)
            .filter(|t| t.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            thread.title = Some(title);
        }
        if let Some(system_instruction) = update.system_instruction {
            thread.system_instruction = system_instruction;
        }
        thread.updated_at = thread.updated_at.max(Utc::now());

        Ok(Some(thread.clone()))
    }

    async fn delete_thread(&self, thread_id: Uuid, user_id: &str) -> Result<bool> {
        let mut store = self.store.write().await;
        let owned = store
            .threads
            .get(&thread_id)
            .is_some_and(|t| t.user_id == user_id);
        if !owned {
            return Ok(false);
        }

        store.threads.remove(&thread_id);
        store.messages.remove(&thread_id);
        Ok(true)
    }

    async fn add_message(&self, message: NewMessage) -> Result<Message> {
        let mut store = self.store.write().await;
        let now = Utc::now();

        let thread = store
            .threads
            .get_mut(&message.thread_id)
            .ok_or_else(|| PersistError::ThreadNotFound(message.thread_id.to_string()))?;
        thread.updated_at = thread.updated_at.max(now);

        let message = message.into_message(now);
        store
            .messages
            .entry(message.thread_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn get_messages(&self, thread_id: Uuid) -> Result<Vec<Message>> {
        let store = self.store.read().await;
        let mut messages = store.messages.get(&thread_id).cloned().unwrap_or_default();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn get_message(&self, message_id: Uuid) -> Result<Option<Message>> {
        let store = self.store.read().await;
        Ok(store
            .messages
            .values()
            .flatten()
            .find(|m| m.id == message_id)
            .cloned())
    }

    async fn upload_audio(&self, blob: AudioBlob) -> Result<String> {
        let key = blob.key();
        match self.store.write().await.audio.entry(key.clone()) {
            Entry::Occupied(_) => {
                return Err(PersistError::Storage(format!("Audio already exists: {}", key)));
            }
            Entry::Vacant(slot) => {
                slot.insert(StoredAudio {
                    content_type: blob.content_type,
                    data: blob.data,
                });
            }
        }
        Ok(audio_reference(self.public_audio_base_url.as_deref(), &key))
    }

    async fn load_audio(&self, key: &str) -> Result<Option<StoredAudio>> {
        Ok(self.store.read().await.audio.get(key).cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
