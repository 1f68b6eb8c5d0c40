pub mod cache;
pub mod duration;
pub mod filename;
pub mod models;
pub mod selector;
pub mod streamer;

pub use cache::MetadataCache;
pub use models::*;

/// Audio bitrate (kbps) assumed when a descriptor does not report one.
pub const DEFAULT_AUDIO_BITRATE: u32 = 128;
