use serde_json::Value;

use crate::sources::{
    ProviderError, StreamDescriptor, Thumbnail, VideoDetails, VideoInfo, youtube::VideoId,
};

/// Audio bitrates (kbps) YouTube uses for well-known itags.
pub fn known_audio_bitrate(itag: u32) -> Option<u32> {
    let kbps = match itag {
        5 | 6 => 64,
        17 => 24,
        18 => 96,
        22 | 37 | 38 | 45 | 46 => 192,
        34 | 35 | 43 | 44 | 59 | 78 => 128,
        82 | 83 | 93 | 94 | 100 => 128,
        84 | 85 | 101 | 102 => 192,
        91 | 92 | 132 | 139 | 249 => 48,
        95 | 96 => 256,
        140 | 171 => 128,
        141 => 256,
        172 => 192,
        250 => 64,
        251 => 160,
        _ => return None,
    };
    Some(kbps)
}

/// Converts an InnerTube `player` response into a [`VideoInfo`].
pub fn parse_player_response(video_id: &VideoId, body: &Value) -> Result<VideoInfo, ProviderError> {
    let playability = body
        .get("playabilityStatus")
        .and_then(|p| p.get("status"))
        .and_then(|s| s.as_str())
        .unwrap_or("UNKNOWN");

    if playability != "OK" {
        let reason = body
            .get("playabilityStatus")
            .and_then(|p| p.get("reason"))
            .and_then(|r| r.as_str())
            .unwrap_or("no reason provided");
        return Err(ProviderError::Unplayable {
            video_id: video_id.to_string(),
            status: playability.to_string(),
            reason: reason.to_string(),
        });
    }

    let details = body
        .get("videoDetails")
        .ok_or_else(|| ProviderError::Malformed(format!("no videoDetails for {}", video_id)))?;

    let streaming_data = body
        .get("streamingData")
        .ok_or_else(|| ProviderError::Malformed(format!("no streamingData for {}", video_id)))?;

    let formats = ["formats", "adaptiveFormats"]
        .iter()
        .filter_map(|key| streaming_data.get(*key).and_then(|v| v.as_array()))
        .flatten()
        .filter_map(parse_format)
        .collect();

    Ok(VideoInfo {
        details: parse_details(details),
        formats,
    })
}

fn parse_details(details: &Value) -> VideoDetails {
    let thumbnails = details
        .get("thumbnail")
        .and_then(|t| t.get("thumbnails"))
        .and_then(|t| t.as_array())
        .map(|list| {
            list.iter()
                .filter_map(|t| {
                    Some(Thumbnail {
                        url: t.get("url")?.as_str()?.to_string(),
                        width: t.get("width").and_then(|w| w.as_u64()).unwrap_or(0) as u32,
                        height: t.get("height").and_then(|h| h.as_u64()).unwrap_or(0) as u32,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    VideoDetails {
        title: details
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string(),
        length_seconds: details
            .get("lengthSeconds")
            .and_then(|l| l.as_str())
            .and_then(|l| l.parse().ok())
            .unwrap_or(0),
        thumbnails,
    }
}

fn parse_format(format: &Value) -> Option<StreamDescriptor> {
    let itag = format.get("itag").and_then(|v| v.as_u64())? as u32;
    let mime_type = format.get("mimeType").and_then(|v| v.as_str())?.to_string();

    // "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"" -> ("video", "mp4")
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    let (media_type, container) = essence.split_once('/')?;

    let has_video = media_type == "video";
    let has_audio = media_type == "audio" || format.get("audioQuality").is_some();
    let bitrate = format.get("bitrate").and_then(|v| v.as_u64()).unwrap_or(0);

    let audio_bitrate = has_audio
        .then(|| {
            known_audio_bitrate(itag).or_else(|| {
                format
                    .get("averageBitrate")
                    .and_then(|v| v.as_u64())
                    .or((!has_video).then_some(bitrate))
                    .map(|bps| ((bps + 500) / 1000) as u32)
                    .filter(|kbps| *kbps > 0)
            })
        })
        .flatten();

    Some(StreamDescriptor {
        itag,
        container: container.to_string(),
        quality_label: format
            .get("qualityLabel")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        bitrate,
        audio_bitrate,
        has_video,
        has_audio,
        content_length: format
            .get("contentLength")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok()),
        url: format.get("url").and_then(|v| v.as_str()).map(str::to_string),
        mime_type,
    })
}
