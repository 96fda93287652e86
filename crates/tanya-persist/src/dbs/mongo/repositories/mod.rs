pub mod audio;
pub mod message;
pub mod thread;

pub use audio::MongoAudioRepository;
pub use message::MongoMessageRepository;
pub use thread::MongoThreadRepository;
