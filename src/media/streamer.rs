use crate::{
    audio::Transcoder,
    common::{DownloadError, types::ByteStream},
    media::{
        FormatKind,
        filename::{content_disposition, sanitize_filename},
    },
    sources::{MetadataProvider, StreamDescriptor, youtube::VideoId},
};

/// A resolved download, ready to be sent as a response body.
pub struct PreparedDownload {
    pub itag: u32,
    pub kind: FormatKind,
    pub filename: String,
    pub body: ByteStream,
}

impl PreparedDownload {
    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    pub fn content_disposition(&self) -> String {
        content_disposition(&self.filename)
    }
}

/// Finds the descriptor for `itag`, swapping a non-mp4 video rendition for an
/// mp4 one with the same quality label when the provider has one.
pub fn resolve_format(formats: &[StreamDescriptor], itag: u32) -> Option<&StreamDescriptor> {
    let requested = formats.iter().find(|f| f.itag == itag)?;
    if requested.is_audio_only() || requested.container == "mp4" {
        return Some(requested);
    }

    let substitute = requested.quality_label.as_deref().and_then(|label| {
        formats.iter().find(|f| {
            f.has_video && f.container == "mp4" && f.quality_label.as_deref() == Some(label)
        })
    });

    match substitute {
        Some(mp4) => {
            tracing::debug!(
                "Substituting mp4 itag {} for {} itag {}",
                mp4.itag,
                requested.container,
                requested.itag
            );
            Some(mp4)
        }
        None => Some(requested),
    }
}

/// Re-fetches the descriptor list, resolves `itag` and opens its byte stream,
/// piping audio-only renditions through the MP3 transcoder.
pub async fn prepare_download(
    provider: &dyn MetadataProvider,
    transcoder: &dyn Transcoder,
    video_id: &VideoId,
    itag: u32,
    default_bitrate: u32,
) -> Result<PreparedDownload, DownloadError> {
    let info = provider
        .get_info(video_id)
        .await
        .map_err(|e| DownloadError::provider("Download failed", e))?;

    let format = resolve_format(&info.formats, itag).ok_or(DownloadError::FormatNotFound)?;
    let kind = if format.is_audio_only() {
        FormatKind::Audio
    } else {
        FormatKind::Video
    };
    let filename = sanitize_filename(&info.details.title, kind);

    let raw = provider
        .open_stream(format)
        .await
        .map_err(|e| DownloadError::provider("Download failed", e))?;

    let body = match kind {
        FormatKind::Audio => {
            let bitrate = format.audio_bitrate.unwrap_or(default_bitrate);
            tracing::info!("Transcoding {} itag {} to MP3 at {} kbps", video_id, format.itag, bitrate);
            transcoder.to_mp3(raw, bitrate).await?
        }
        FormatKind::Video => raw,
    };

    Ok(PreparedDownload {
        itag: format.itag,
        kind,
        filename,
        body,
    })
}
