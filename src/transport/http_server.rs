use std::sync::Arc;

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    common::ErrorBody,
    server::AppState,
    transport::{
        middleware::add_response_headers,
        routes::{download, info, pages, stream},
    },
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/get-video-info", post(pages::video_info_page))
        .route("/download", post(download::video_info))
        .route("/download/{itag}", get(stream::download_stream))
        .route("/version", get(info::get_version))
        .fallback(not_found)
        .layer(middleware::from_fn(add_response_headers))
        .with_state(state)
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!("No route for {}", uri.path());
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not Found")))
}
