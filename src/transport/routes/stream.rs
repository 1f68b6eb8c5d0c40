use std::{borrow::Cow, sync::Arc};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    common::DownloadError, media::streamer::prepare_download, server::AppState,
    transport::routes::download::parse_and_validate,
};

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub url: Option<String>,
}

/// GET /download/{itag}?url=...
pub async fn download_stream(
    Path(itag): Path<String>,
    Query(params): Query<StreamQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, DownloadError> {
    tracing::info!("GET /download/{} url={:?}", itag, params.url);

    let raw_url = params
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(DownloadError::MissingParams("Missing URL or itag"))?;

    // clients sometimes encode the url twice
    let decoded = urlencoding::decode(raw_url)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw_url.to_string());
    let video_id = parse_and_validate(&state, &decoded)?;

    let Ok(itag) = itag.trim().parse::<u32>() else {
        tracing::warn!("GET /download/{}: itag is not numeric", itag);
        return Err(DownloadError::FormatNotFound);
    };

    let download = match prepare_download(
        state.provider.as_ref(),
        state.transcoder.as_ref(),
        &video_id,
        itag,
        state.default_bitrate(),
    )
    .await
    {
        Ok(download) => download,
        Err(DownloadError::FormatNotFound) => {
            // the cached list advertised something the provider no longer has
            if state.cache.invalidate(&video_id) {
                tracing::debug!("Dropped cached formats for {}", video_id);
            }
            tracing::warn!("GET /download/{}: itag not offered for {}", itag, video_id);
            return Err(DownloadError::FormatNotFound);
        }
        Err(e) => {
            tracing::error!("GET /download/{}: {} failed: {}", itag, video_id, e);
            return Err(e);
        }
    };

    tracing::info!(
        "Streaming {} itag {} as '{}' ({})",
        video_id,
        download.itag,
        download.filename,
        download.content_type()
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(download.content_type()),
    );
    if let Ok(v) = HeaderValue::from_str(&download.content_disposition()) {
        headers.insert(header::CONTENT_DISPOSITION, v);
    }

    Ok((StatusCode::OK, headers, Body::from_stream(download.body)).into_response())
}
