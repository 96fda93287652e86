pub mod builder;
pub mod dbs;
pub mod error;
pub mod models;
pub mod trait_client;

pub use builder::{PersistenceBuilder, StorageBackend};
pub use dbs::memory::InMemoryPersistenceClient;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
pub use error::{PersistError, Result};
pub use models::{
    audio_reference, AudioBlob, Message, MessageRole, NewMessage, NewThread, StoredAudio, Thread,
    ThreadUpdate, AUDIO_ROUTE_PREFIX,
};
pub use trait_client::PersistenceClient;
