use async_trait::async_trait;
use thiserror::Error;

use crate::{common::types::ByteStream, sources::youtube::VideoId};

/// One rendition of a video as reported by the provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamDescriptor {
    pub itag: u32,
    pub mime_type: String,
    /// Container name taken from the mime subtype (`mp4`, `webm`, ...).
    pub container: String,
    pub quality_label: Option<String>,
    /// Overall bitrate in bits per second.
    pub bitrate: u64,
    /// Audio bitrate in kbps; `None` for video-only renditions.
    pub audio_bitrate: Option<u32>,
    pub has_video: bool,
    pub has_audio: bool,
    pub content_length: Option<u64>,
    pub url: Option<String>,
}

impl StreamDescriptor {
    pub fn is_audio_only(&self) -> bool {
        !self.has_video && self.has_audio
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoDetails {
    pub title: String,
    pub length_seconds: u64,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoInfo {
    pub details: VideoDetails,
    pub formats: Vec<StreamDescriptor>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("video {video_id} is not playable ({status}): {reason}")]
    Unplayable {
        video_id: String,
        status: String,
        reason: String,
    },

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("format {0} has no stream url")]
    NoStreamUrl(u32),
}

/// Source of video metadata and media bytes.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Whether `url` is a watch URL this provider can resolve.
    fn validate_url(&self, url: &str) -> bool;

    /// Fetches details and the full descriptor list for a video.
    async fn get_info(&self, video_id: &VideoId) -> Result<VideoInfo, ProviderError>;

    /// Opens the raw media byte stream for one descriptor.
    async fn open_stream(&self, format: &StreamDescriptor) -> Result<ByteStream, ProviderError>;
}
