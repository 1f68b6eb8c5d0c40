use serde::{Deserialize, Serialize};

use crate::sources::StreamDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Video,
    Audio,
}

impl FormatKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Video => ".mp4",
            Self::Audio => ".mp3",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Video => "video/mp4",
            Self::Audio => "audio/mpeg",
        }
    }
}

/// A descriptor promoted into the user-facing format list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFormat {
    pub itag: u32,
    pub quality: String,
    pub container: String,
    pub has_video: bool,
    pub has_audio: bool,
    #[serde(rename = "type")]
    pub kind: FormatKind,
}

impl SelectedFormat {
    pub fn video(format: &StreamDescriptor) -> Self {
        Self {
            itag: format.itag,
            quality: format.quality_label.clone().unwrap_or_default(),
            container: format.container.clone(),
            has_video: true,
            has_audio: format.has_audio,
            kind: FormatKind::Video,
        }
    }

    /// Audio entries are always offered as MP3, whatever the source container.
    pub fn audio(format: &StreamDescriptor, default_bitrate: u32) -> Self {
        Self {
            itag: format.itag,
            quality: format!("{}kbps", format.audio_bitrate.unwrap_or(default_bitrate)),
            container: "mp3".to_string(),
            has_video: false,
            has_audio: true,
            kind: FormatKind::Audio,
        }
    }
}

/// What `POST /download` returns for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub duration: String,
    pub formats: Vec<SelectedFormat>,
}
