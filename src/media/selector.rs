//! Reduces a provider's descriptor list to the handful of choices shown to users.

use crate::{
    media::{SelectedFormat, VideoMetadata, duration::to_human_time},
    sources::{StreamDescriptor, Thumbnail, VideoInfo},
};

/// Offered video tiers, best first.
pub const QUALITY_TIERS: [&str; 6] = ["2160p", "1440p", "1080p", "720p", "480p", "360p"];

fn is_video_candidate(format: &StreamDescriptor) -> bool {
    format.has_video
        && format.container == "mp4"
        && format
            .quality_label
            .as_deref()
            .is_some_and(|label| QUALITY_TIERS.contains(&label))
}

/// Picks one descriptor for a tier: muxed mp4 first, then anything with
/// audio, then the highest bitrate (first one wins ties).
fn pick_for_tier<'a>(candidates: &[&'a StreamDescriptor]) -> Option<&'a StreamDescriptor> {
    candidates
        .iter()
        .find(|f| f.container == "mp4" && f.has_audio)
        .or_else(|| candidates.iter().find(|f| f.has_audio))
        .or_else(|| {
            candidates
                .iter()
                .reduce(|best, current| if current.bitrate > best.bitrate { current } else { best })
        })
        .copied()
}

/// Highest audio bitrate among audio-only descriptors; the first one wins ties.
pub fn best_audio(formats: &[StreamDescriptor]) -> Option<&StreamDescriptor> {
    formats
        .iter()
        .filter(|f| f.is_audio_only())
        .fold(None, |best: Option<&StreamDescriptor>, current| match best {
            Some(b) if current.audio_bitrate.unwrap_or(0) <= b.audio_bitrate.unwrap_or(0) => Some(b),
            _ => Some(current),
        })
}

/// Video tiers in descending resolution, followed by the best audio entry.
pub fn select_formats(formats: &[StreamDescriptor], default_bitrate: u32) -> Vec<SelectedFormat> {
    let candidates: Vec<&StreamDescriptor> =
        formats.iter().filter(|f| is_video_candidate(f)).collect();

    let mut selected: Vec<SelectedFormat> = QUALITY_TIERS
        .iter()
        .filter_map(|tier| {
            let in_tier: Vec<&StreamDescriptor> = candidates
                .iter()
                .copied()
                .filter(|f| f.quality_label.as_deref() == Some(*tier))
                .collect();
            pick_for_tier(&in_tier)
        })
        .map(SelectedFormat::video)
        .collect();

    if let Some(audio) = best_audio(formats) {
        selected.push(SelectedFormat::audio(audio, default_bitrate));
    }
    selected
}

/// Widest thumbnail; the first one wins ties.
pub fn best_thumbnail(thumbnails: &[Thumbnail]) -> Option<&Thumbnail> {
    thumbnails.iter().fold(None, |best: Option<&Thumbnail>, current| match best {
        Some(b) if current.width <= b.width => Some(b),
        _ => Some(current),
    })
}

pub fn build_metadata(info: &VideoInfo, default_bitrate: u32) -> VideoMetadata {
    VideoMetadata {
        title: info.details.title.clone(),
        thumbnail_url: best_thumbnail(&info.details.thumbnails).map(|t| t.url.clone()),
        duration: to_human_time(info.details.length_seconds),
        formats: select_formats(&info.formats, default_bitrate),
    }
}
