use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::{
    common::DownloadError,
    media::{VideoMetadata, selector::build_metadata},
    server::AppState,
    sources::{ProviderError, youtube::VideoId},
};

#[derive(Debug, Default, Deserialize)]
pub struct DownloadRequest {
    pub url: Option<String>,
}

/// POST /download
pub async fn video_info(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<VideoMetadata>, DownloadError> {
    let url = match payload {
        Ok(Json(request)) => request.url,
        Err(rejection) => {
            tracing::warn!("POST /download: unreadable body: {}", rejection);
            None
        }
    };
    tracing::info!("POST /download url={:?}", url);

    let (_, metadata) = load_metadata(&state, url.as_deref()).await?;
    Ok(Json(VideoMetadata::clone(&metadata)))
}

/// Normalizes `raw_url` and checks it with the provider.
pub(crate) fn parse_and_validate(state: &AppState, raw_url: &str) -> Result<VideoId, DownloadError> {
    let video_id = VideoId::parse(raw_url).inspect_err(|_| {
        tracing::warn!("Rejected URL '{}': unrecognized shape", raw_url);
    })?;

    if !state.provider.validate_url(&video_id.watch_url()) {
        tracing::warn!(
            "Rejected URL '{}': {} refused id {}",
            raw_url,
            state.provider.name(),
            video_id
        );
        return Err(DownloadError::RejectedUrl);
    }
    Ok(video_id)
}

/// Cached selected-format list for the video behind `raw_url`.
pub(crate) async fn load_metadata(
    state: &AppState,
    raw_url: Option<&str>,
) -> Result<(VideoId, Arc<VideoMetadata>), DownloadError> {
    let raw_url = raw_url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(DownloadError::MissingParams("Please provide a YouTube URL"))?;

    let video_id = parse_and_validate(state, raw_url)?;
    let provider = state.provider.as_ref();
    let default_bitrate = state.default_bitrate();
    let id = &video_id;

    let metadata = state
        .cache
        .get_or_fetch(id, || async move {
            let info = provider.get_info(id).await?;
            Ok::<_, ProviderError>(build_metadata(&info, default_bitrate))
        })
        .await
        .map_err(|e| {
            tracing::error!(
                "Metadata fetch failed for {} (url={}): {}",
                video_id,
                raw_url,
                e
            );
            DownloadError::provider("Failed to process video", e)
        })?;

    Ok((video_id, metadata))
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::*;
    use crate::transport::routes::test_support::*;

    async fn call(state: &Arc<AppState>, url: Option<&str>) -> axum::response::Response {
        let request = DownloadRequest {
            url: url.map(str::to_string),
        };
        video_info(State(state.clone()), Ok(Json(request)))
            .await
            .into_response()
    }

    #[tokio::test]
    async fn test_returns_selected_formats() {
        let provider = Arc::new(FakeProvider::new(sample_info()));
        let state = state_with(provider.clone(), Arc::default());

        let response = call(&state, Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["title"], "Café – 日本語 Song?!");
        assert_eq!(body["duration"], "03:32");
        assert_eq!(
            body["thumbnail_url"],
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );

        let formats = body["formats"].as_array().unwrap();
        let itags: Vec<u64> = formats.iter().map(|f| f["itag"].as_u64().unwrap()).collect();
        assert_eq!(itags, vec![137, 22, 251]);
        assert_eq!(formats[2]["quality"], "160kbps");
        assert_eq!(formats[2]["type"], "audio");
        assert_eq!(formats[2]["container"], "mp3");
        assert_eq!(formats[0]["hasAudio"], false);
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let provider = Arc::new(FakeProvider::new(sample_info()));
        let state = state_with(provider.clone(), Arc::default());

        let first = body_bytes(call(&state, Some("https://youtu.be/dQw4w9WgXcQ")).await).await;
        let second = body_bytes(call(&state, Some("https://youtu.be/dQw4w9WgXcQ")).await).await;

        assert_eq!(first, second);
        assert_eq!(provider.info_calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_is_keyed_by_video_id() {
        let provider = Arc::new(FakeProvider::new(sample_info()));
        let state = state_with(provider.clone(), Arc::default());

        for url in [
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=share",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        ] {
            assert_eq!(call(&state, Some(url)).await.status(), StatusCode::OK);
        }
        assert_eq!(provider.info_calls(), 1);
        assert_eq!(state.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_url() {
        let provider = Arc::new(FakeProvider::new(sample_info()));
        let state = state_with(provider.clone(), Arc::default());

        for url in [None, Some(""), Some("   ")] {
            let response = call(&state, url).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await,
                serde_json::json!({ "error": "Please provide a YouTube URL" })
            );
        }
        assert_eq!(provider.info_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let provider = Arc::new(FakeProvider::new(sample_info()));
        let state = state_with(provider.clone(), Arc::default());

        let response = call(&state, Some("not-a-url")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid YouTube URL format");

        let response = call(&state, Some("https://youtu.be/tooshort")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid YouTube URL");

        assert_eq!(provider.info_calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_500_and_not_cached() {
        let provider = Arc::new(FakeProvider::failing("Video unavailable"));
        let state = state_with(provider.clone(), Arc::default());

        let response = call(&state, Some("https://youtu.be/dQw4w9WgXcQ")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to process video");
        assert!(body["details"].as_str().unwrap().contains("Video unavailable"));

        call(&state, Some("https://youtu.be/dQw4w9WgXcQ")).await;
        assert_eq!(provider.info_calls(), 2);
        assert!(state.cache.is_empty());
    }
}
