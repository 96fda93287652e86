pub mod audio;
pub mod health;
pub mod messages;
pub mod threads;
