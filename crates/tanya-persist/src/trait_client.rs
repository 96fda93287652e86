use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AudioBlob, Message, NewMessage, NewThread, StoredAudio, Thread, ThreadUpdate};

/// Trait for database persistence operations
///
/// Every thread-scoped read and write takes the caller's `user_id`, and a
/// thread owned by someone else behaves exactly like a missing one.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Create a new thread; `created_at == updated_at`
    async fn create_thread(&self, user_id: &str, thread: NewThread) -> Result<Thread>;

    /// Get a thread owned by `user_id`
    async fn get_thread(&self, thread_id: Uuid, user_id: &str) -> Result<Option<Thread>>;

    /// List threads for a user, most recently updated first
    async fn list_threads(&self, user_id: &str, limit: i64, skip: u64) -> Result<Vec<Thread>>;

    /// Apply a partial update and bump `updated_at`
    async fn update_thread(
        &self,
        thread_id: Uuid,
        user_id: &str,
        update: ThreadUpdate,
    ) -> Result<Option<Thread>>;

    /// Delete a thread and all of its messages. Returns `false` when nothing matched.
    async fn delete_thread(&self, thread_id: Uuid, user_id: &str) -> Result<bool>;

    /// Append a message and bump the parent thread's `updated_at`
    async fn add_message(&self, message: NewMessage) -> Result<Message>;

    /// All messages for a thread, oldest first
    async fn get_messages(&self, thread_id: Uuid) -> Result<Vec<Message>>;

    async fn get_message(&self, message_id: Uuid) -> Result<Option<Message>>;

    /// Store audio bytes and return the durable reference
    async fn upload_audio(&self, blob: AudioBlob) -> Result<String>;

    async fn load_audio(&self, key: &str) -> Result<Option<StoredAudio>>;

    /// Backend health probe
    async fn ping(&self) -> Result<()>;
}
