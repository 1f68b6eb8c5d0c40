use serde::{Deserialize, Serialize};

use crate::media::DEFAULT_AUDIO_BITRATE;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct TranscoderConfig {
    pub ffmpeg_path: String,
    /// kbps used when a descriptor carries no audio bitrate.
    pub default_bitrate: u32,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            default_bitrate: DEFAULT_AUDIO_BITRATE,
        }
    }
}
