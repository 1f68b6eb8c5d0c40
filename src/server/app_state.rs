use std::sync::Arc;

use crate::{
    audio::{FfmpegTranscoder, Transcoder},
    common::types::AnyResult,
    configs::Config,
    media::MetadataCache,
    sources::{MetadataProvider, youtube::YouTubeProvider},
};

/// Top-level application state.
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn MetadataProvider>,
    pub transcoder: Arc<dyn Transcoder>,
    /// Selected formats per video id, shared by every request.
    pub cache: MetadataCache,
}

impl AppState {
    /// Wires the production InnerTube provider and ffmpeg transcoder.
    pub fn new(config: Config) -> AnyResult<Self> {
        let provider = Arc::new(YouTubeProvider::new(&config.youtube)?);
        let transcoder = Arc::new(FfmpegTranscoder::new(config.transcoder.ffmpeg_path.clone()));
        Ok(Self::with_collaborators(config, provider, transcoder))
    }

    pub fn with_collaborators(
        config: Config,
        provider: Arc<dyn MetadataProvider>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        let cache = MetadataCache::new(config.cache.ttl());
        Self {
            config,
            provider,
            transcoder,
            cache,
        }
    }

    pub fn default_bitrate(&self) -> u32 {
        self.config.transcoder.default_bitrate
    }
}
