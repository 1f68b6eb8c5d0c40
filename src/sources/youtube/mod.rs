use std::io;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};

use crate::{
    common::types::ByteStream,
    configs::YouTubeConfig,
    sources::{MetadataProvider, ProviderError, StreamDescriptor, VideoInfo},
};

pub mod client;
pub mod extractor;
pub mod video_id;

use client::InnerTubeClient;
pub use video_id::{InvalidUrl, VideoId};

const VALID_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
    "youtu.be",
];

/// [`MetadataProvider`] backed by YouTube's InnerTube API.
pub struct YouTubeProvider {
    client: InnerTubeClient,
}

impl YouTubeProvider {
    pub fn new(config: &YouTubeConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: InnerTubeClient::new(config)?,
        })
    }
}

/// Appends the `range` parameter googlevideo expects for full-length reads.
pub fn ranged_media_url(format: &StreamDescriptor) -> Result<String, ProviderError> {
    let raw = format
        .url
        .as_deref()
        .ok_or(ProviderError::NoStreamUrl(format.itag))?;
    let mut url = reqwest::Url::parse(raw).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    if let Some(len) = format.content_length.filter(|len| *len > 0) {
        url.query_pairs_mut()
            .append_pair("range", &format!("0-{}", len - 1));
    }
    Ok(url.into())
}

#[async_trait]
impl MetadataProvider for YouTubeProvider {
    fn name(&self) -> &str {
        "youtube"
    }

    fn validate_url(&self, url: &str) -> bool {
        let host_ok = reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .is_some_and(|host| VALID_HOSTS.contains(&host.as_str()));

        host_ok
            && VideoId::parse(url)
                .map(|id| id.is_well_formed())
                .unwrap_or(false)
    }

    async fn get_info(&self, video_id: &VideoId) -> Result<VideoInfo, ProviderError> {
        let body = self.client.player(video_id).await?;
        let info = extractor::parse_player_response(video_id, &body)?;
        tracing::debug!(
            "Resolved {} '{}' with {} format(s)",
            video_id,
            info.details.title,
            info.formats.len()
        );
        Ok(info)
    }

    async fn open_stream(&self, format: &StreamDescriptor) -> Result<ByteStream, ProviderError> {
        let url = ranged_media_url(format)?;
        tracing::debug!(
            "Opening media stream itag={} mime={} length={:?}",
            format.itag,
            format.mime_type,
            format.content_length
        );

        let res = self.client.media(&url).await?;
        Ok(res.bytes_stream().map_err(io::Error::other).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> YouTubeProvider {
        YouTubeProvider::new(&YouTubeConfig::default()).unwrap()
    }

    #[test]
    fn test_validate_url() {
        let p = provider();
        assert!(p.validate_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(p.validate_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(p.validate_url("https://m.youtube.com/shorts/dQw4w9WgXcQ"));
        assert!(!p.validate_url("https://www.youtube.com/watch?v=short"));
        assert!(!p.validate_url("https://evil.example/youtu.be/dQw4w9WgXcQ"));
        assert!(!p.validate_url("not-a-url"));
    }

    #[test]
    fn test_ranged_media_url() {
        let format = StreamDescriptor {
            itag: 137,
            url: Some("https://rr1.googlevideo.com/videoplayback?itag=137".into()),
            content_length: Some(1000),
            ..Default::default()
        };
        assert_eq!(
            ranged_media_url(&format).unwrap(),
            "https://rr1.googlevideo.com/videoplayback?itag=137&range=0-999"
        );

        let unknown_length = StreamDescriptor {
            content_length: None,
            ..format.clone()
        };
        assert_eq!(
            ranged_media_url(&unknown_length).unwrap(),
            "https://rr1.googlevideo.com/videoplayback?itag=137"
        );

        let no_url = StreamDescriptor {
            url: None,
            ..format
        };
        assert!(matches!(
            ranged_media_url(&no_url),
            Err(ProviderError::NoStreamUrl(137))
        ));
    }
}
