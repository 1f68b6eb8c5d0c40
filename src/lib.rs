pub mod audio;
pub mod common;
pub mod configs;
pub mod media;
pub mod server;
pub mod sources;
pub mod transport;
