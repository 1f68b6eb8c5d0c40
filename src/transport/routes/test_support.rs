//! Fakes for exercising handlers without network or ffmpeg.

use std::sync::{
    Arc,
    atomic::{AtomicU32, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{body::to_bytes, response::Response};
use bytes::Bytes;
use futures::{StreamExt, stream};

use crate::{
    audio::{TranscodeError, Transcoder},
    common::types::ByteStream,
    configs::Config,
    server::AppState,
    sources::{
        MetadataProvider, ProviderError, StreamDescriptor, Thumbnail, VideoDetails, VideoInfo,
        youtube::VideoId,
    },
};

pub const VIDEO_ID: &str = "dQw4w9WgXcQ";

pub struct FakeProvider {
    info: VideoInfo,
    failure: Option<String>,
    pub info_calls: AtomicUsize,
    pub opened: AtomicUsize,
}

impl FakeProvider {
    pub fn new(info: VideoInfo) -> Self {
        Self {
            info,
            failure: None,
            info_calls: AtomicUsize::new(0),
            opened: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(VideoInfo::default())
        }
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn validate_url(&self, url: &str) -> bool {
        VideoId::parse(url).is_ok_and(|id| id.is_well_formed())
    }

    async fn get_info(&self, _video_id: &VideoId) -> Result<VideoInfo, ProviderError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(ProviderError::Malformed(message.clone())),
            None => Ok(self.info.clone()),
        }
    }

    async fn open_stream(&self, format: &StreamDescriptor) -> Result<ByteStream, ProviderError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let chunks: Vec<std::io::Result<Bytes>> = vec![
            Ok(Bytes::from(format!("itag-{}", format.itag))),
            Ok(Bytes::from_static(b"|eof")),
        ];
        Ok(stream::iter(chunks).boxed())
    }
}

/// Prefixes the input with a marker naming the requested bitrate.
#[derive(Default)]
pub struct FakeTranscoder {
    pub fail: bool,
    pub last_bitrate: AtomicU32,
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn to_mp3(&self, input: ByteStream, bitrate_kbps: u32) -> Result<ByteStream, TranscodeError> {
        if self.fail {
            return Err(TranscodeError::Feed("encoder unavailable".to_string()));
        }
        self.last_bitrate.store(bitrate_kbps, Ordering::SeqCst);
        let marker = stream::once(async move {
            Ok::<_, std::io::Error>(Bytes::from(format!("mp3@{}k:", bitrate_kbps)))
        });
        Ok(marker.chain(input).boxed())
    }
}

pub fn descriptor(
    itag: u32,
    container: &str,
    label: Option<&str>,
    has_video: bool,
    audio_kbps: Option<u32>,
) -> StreamDescriptor {
    StreamDescriptor {
        itag,
        mime_type: format!(
            "{}/{}",
            if has_video { "video" } else { "audio" },
            container
        ),
        container: container.to_string(),
        quality_label: label.map(str::to_string),
        bitrate: 1_000_000,
        audio_bitrate: audio_kbps,
        has_video,
        has_audio: audio_kbps.is_some(),
        content_length: None,
        url: Some(format!("https://media.example/{}", itag)),
    }
}

pub fn sample_info() -> VideoInfo {
    VideoInfo {
        details: VideoDetails {
            title: "Café – 日本語 Song?!".to_string(),
            length_seconds: 212,
            thumbnails: vec![
                Thumbnail {
                    url: "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg".to_string(),
                    width: 120,
                    height: 90,
                },
                Thumbnail {
                    url: "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".to_string(),
                    width: 1280,
                    height: 720,
                },
            ],
        },
        formats: vec![
            descriptor(22, "mp4", Some("720p"), true, Some(192)),
            descriptor(137, "mp4", Some("1080p"), true, None),
            descriptor(248, "webm", Some("1080p"), true, None),
            descriptor(140, "mp4", None, false, Some(128)),
            descriptor(251, "webm", None, false, Some(160)),
        ],
    }
}

pub fn state_with(provider: Arc<FakeProvider>, transcoder: Arc<FakeTranscoder>) -> Arc<AppState> {
    Arc::new(AppState::with_collaborators(
        Config::default(),
        provider,
        transcoder,
    ))
}

pub async fn body_bytes(response: Response) -> Bytes {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}
