pub mod stream;
pub mod voice;
