use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoThread;
use crate::error::Result;
use crate::models::ThreadUpdate;

#[derive(Clone)]
pub struct MongoThreadRepository {
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("threads");
        Self { collection }
    }

    pub async fn insert(&self, thread: &MongoThread) -> Result<()> {
        self.collection.insert_one(thread).await?;
        Ok(())
    }

    /// Get thread by ID, scoped to its owner
    pub async fn get_thread(&self, thread_id: &str, user_id: &str) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id, "user_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// List threads for a user
    pub async fn list_threads(
        &self,
        user_id: &str,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<MongoThread>> {
        let filter = doc! { "user_id": user_id };
        let threads = self
            .collection
            .find(filter)
            .sort(doc! { "updated_at": -1, "_id": -1 })
            .skip(skip)
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(threads)
    }

    /// Partial update; `updated_at` only ever moves forward
    pub async fn update_thread(
        &self,
        thread_id: &str,
        user_id: &str,
        update: ThreadUpdate,
    ) -> Result<Option<MongoThread>> {
        let mut set = Document::new();
        if let Some(title) = update.title {
            set.insert("title", title);
        }
        if let Some(system_instruction) = update.system_instruction {
            set.insert("system_instruction", system_instruction);
        }

        let mut changes = doc! {
            "$max": { "updated_at": bson::DateTime::from_chrono(Utc::now()) }
        };
        if !set.is_empty() {
            changes.insert("$set", set);
        }

        let filter = doc! { "_id": thread_id, "user_id": user_id };
        let thread = self
            .collection
            .find_one_and_update(filter, changes)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(thread)
    }

    /// Bump `updated_at`; returns `false` when the thread does not exist
    pub async fn touch(&self, thread_id: &str, at: DateTime<Utc>) -> Result<bool> {
        let filter = doc! { "_id": thread_id };
        let update = doc! { "$max": { "updated_at": bson::DateTime::from_chrono(at) } };
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    pub async fn delete_thread(&self, thread_id: &str, user_id: &str) -> Result<bool> {
        let filter = doc! { "_id": thread_id, "user_id": user_id };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }
}
